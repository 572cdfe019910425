//! Time spent at a level.

use crate::Time;
use crate::signal::Signal;

impl<T: Time> Signal<T> {
    /// Total time the signal holds `level`.
    ///
    /// Edges pair up as `(edges[0], edges[1]), (edges[2], edges[3]), ...`;
    /// each pair bounds an interval at the inverse of the start level, and an
    /// odd trailing edge runs to the end. `None` for the void signal.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgewise::Signal;
    ///
    /// let s = Signal::new(0, vec![2, 5], 10, false).unwrap();
    /// assert_eq!(s.integral(true), Some(3));
    /// assert_eq!(s.integral(false), Some(7));
    /// ```
    pub fn integral(&self, level: bool) -> Option<T> {
        let w = self.waveform()?;
        let mut toggled = T::ZERO;
        for pair in w.edges.chunks(2) {
            toggled = toggled
                + match *pair {
                    [on, off] => off - on,
                    [on] => w.end - on,
                    _ => T::ZERO,
                };
        }
        Some(if level != w.slevel {
            toggled
        } else {
            w.elapse() - toggled
        })
    }

    /// Fraction of the domain spent at `level`, in `[0, 1]`.
    pub fn duty_cycle(&self, level: bool) -> Option<f64> {
        let integral = self.integral(level)?;
        let elapse = self.elapse()?;
        Some(integral.to_f64() / elapse.to_f64())
    }
}
