//! Gaussian noise source.

use rand::Rng;
use std::f64::consts::TAU;

/// A normally distributed noise source with zero mean.
///
/// Draws come in pairs from the Box-Muller transform; the second draw of
/// each pair is kept for the next call.
pub struct GaussianNoise<R: Rng = rand::rngs::ThreadRng> {
    /// Standard deviation of each draw
    stddev: f64,
    /// Random number generator
    rng: R,
    /// Unused half of the last Box-Muller pair
    spare: Option<f64>,
}

impl GaussianNoise<rand::rngs::ThreadRng> {
    /// Creates a Gaussian noise source with the default ThreadRng.
    ///
    /// # Arguments
    ///
    /// * `stddev` - Standard deviation of the draws, in signal time units
    ///
    /// # Examples
    ///
    /// ```
    /// use edgewise::GaussianNoise;
    ///
    /// let mut noise = GaussianNoise::new(0.5);
    /// let offset = noise.next_sample();
    /// assert!(offset.is_finite());
    /// ```
    pub fn new(stddev: f64) -> Self {
        Self::with_rng(stddev, rand::thread_rng())
    }
}

impl<R: Rng> GaussianNoise<R> {
    /// Creates a Gaussian noise source with a custom RNG.
    ///
    /// # Arguments
    ///
    /// * `stddev` - Standard deviation of the draws, in signal time units
    /// * `rng` - Random number generator to use
    ///
    /// # Examples
    ///
    /// ```
    /// use edgewise::GaussianNoise;
    /// use rand::SeedableRng;
    ///
    /// let rng = rand::rngs::StdRng::seed_from_u64(42);
    /// let mut noise = GaussianNoise::with_rng(0.5, rng);
    /// let offset = noise.next_sample();
    /// ```
    pub fn with_rng(stddev: f64, rng: R) -> Self {
        Self {
            stddev,
            rng,
            spare: None,
        }
    }

    pub fn stddev(&self) -> f64 {
        self.stddev
    }

    /// Draws the next value from `N(0, stddev²)`.
    pub fn next_sample(&mut self) -> f64 {
        if let Some(spare) = self.spare.take() {
            return spare * self.stddev;
        }

        // u1 must stay away from zero for the logarithm
        let u1: f64 = self.rng.gen_range(f64::MIN_POSITIVE..1.0);
        let u2: f64 = self.rng.gen_range(0.0..1.0);
        let radius = (-2.0 * u1.ln()).sqrt();
        let angle = TAU * u2;

        self.spare = Some(radius * angle.sin());
        radius * angle.cos() * self.stddev
    }
}
