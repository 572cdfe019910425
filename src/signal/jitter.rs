//! Random timing perturbation of edges.

use super::waveform::Signal;
use crate::{GaussianNoise, Time};
use rand::Rng;

impl<T: Time> Signal<T> {
    /// Moves every edge by a Gaussian draw, in place.
    ///
    /// A draw that would take an edge onto or past one of its neighbours,
    /// or outside `[start, end]`, is rejected and the edge stays put, so
    /// the signal remains valid. Edges are visited in order and each one is
    /// bounded by the already-perturbed edge before it. Integer times round
    /// the perturbed position to the nearest tick.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgewise::{GaussianNoise, Signal};
    /// use rand::SeedableRng;
    ///
    /// let mut noise = GaussianNoise::with_rng(0.1, rand::rngs::StdRng::seed_from_u64(3));
    /// let mut s = Signal::new(0.0, vec![1.0, 2.0, 3.0], 4.0, false).unwrap();
    /// s.jitter(&mut noise);
    /// assert!(s.validate().is_ok());
    /// ```
    pub fn jitter<R: Rng>(&mut self, noise: &mut GaussianNoise<R>) {
        let Signal::Present(w) = self else {
            return;
        };
        let count = w.edges.len();
        for i in 0..count {
            let moved = T::from_f64(w.edges[i].to_f64() + noise.next_sample());
            let above = if i == 0 {
                moved >= w.start
            } else {
                moved > w.edges[i - 1]
            };
            let below = if i + 1 == count {
                moved <= w.end
            } else {
                moved < w.edges[i + 1]
            };
            if above && below {
                w.edges[i] = moved;
            }
        }
    }

    /// Returns a jittered copy.
    pub fn jittered<R: Rng>(&self, noise: &mut GaussianNoise<R>) -> Self {
        let mut jittered = self.clone();
        jittered.jitter(noise);
        jittered
    }
}
