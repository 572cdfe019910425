//! Sliding agreement between signals and phase search.

use log::debug;

use crate::Time;
use crate::signal::{Result, Signal, SignalError};

/// One position of a correlation sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationPoint<T: Time> {
    /// Offset applied to the shifted signal at this position.
    pub shift: T,
    /// Agreement between the shifted signal and the reference.
    pub score: f64,
}

/// Width of a refinement window, relative to the previous resolution.
const REFINE_WINDOW: f64 = 1.3;

impl<T: Time> Signal<T> {
    /// Measures how well `self` matches `other` without shifting.
    ///
    /// The score is the time both signals spend at the same level, taken
    /// over their common domain. Where `mask` is low the signals count as
    /// agreeing, so masked-out regions never register a mismatch; outside
    /// the mask's domain nothing is counted. With `normalize` the score is
    /// mapped from `[0, elapse]` onto `[-1, +1]`.
    ///
    /// `None` when the signals (and mask) share no domain.
    pub fn agreement(
        &self,
        other: &Signal<T>,
        mask: Option<&Signal<T>>,
        normalize: bool,
    ) -> Option<f64> {
        let mut mismatch = self.xor(other);
        if let Some(mask) = mask {
            mismatch = mismatch.and(mask);
        }
        let agree = mismatch.integral(false)?.to_f64();
        let elapse = mismatch.elapse()?.to_f64();
        Some(if normalize {
            2.0 * agree / elapse - 1.0
        } else {
            agree
        })
    }

    /// Slides `self` across `other` and records the agreement at each step.
    ///
    /// The sweep starts with the end of `self` aligned to the start of
    /// `other`, moved on by `skip`, and advances by `step` while the total
    /// advance stays within `width`. Each point records the total shift
    /// applied to `self`; positions with no overlap are left out. The mask,
    /// if any, is in the time frame of `other`.
    ///
    /// # Errors
    ///
    /// [`SignalError::InvalidParameter`] if `step` is not positive.
    pub fn correlation(
        &self,
        other: &Signal<T>,
        mask: Option<&Signal<T>>,
        step: T,
        skip: T,
        width: T,
        normalize: bool,
    ) -> Result<Vec<CorrelationPoint<T>>> {
        check_step(step)?;
        let (Some(end), Some(start)) = (self.end(), other.start()) else {
            return Ok(Vec::new());
        };
        let first = start - end + skip;
        Ok(self.sweep(other, mask, first, step, width, normalize))
    }

    fn sweep(
        &self,
        other: &Signal<T>,
        mask: Option<&Signal<T>>,
        first: T,
        step: T,
        width: T,
        normalize: bool,
    ) -> Vec<CorrelationPoint<T>> {
        let mut points = Vec::new();
        let mut advance = T::ZERO;
        let mut k = 0_i64;
        while advance <= width {
            let shift = first + advance;
            if let Some(score) = self.shifted(shift).agreement(other, mask, normalize) {
                points.push(CorrelationPoint { shift, score });
            }
            k += 1;
            advance = step * T::from_f64(k as f64);
        }
        points
    }

    /// Finds the shift of `self` that best matches `other`.
    ///
    /// A coarse sweep over every overlapping position runs at
    /// `resolutions[0]`. Each further resolution sweeps a window of
    /// 1.3 times the previous resolution, centered on the best shift so far.
    /// Ties go to the earliest shift. With `period`, the result is folded
    /// into `[-period/2, period/2)`.
    ///
    /// Returns `Ok(None)` when either signal is void or they never overlap.
    ///
    /// # Errors
    ///
    /// [`SignalError::InvalidParameter`] if `resolutions` is empty or holds
    /// a non-positive step.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgewise::Signal;
    ///
    /// let reference = Signal::new(0, vec![3, 7, 8, 15], 20, false).unwrap();
    /// let delayed = reference.shifted(4);
    /// let phase = reference.phase(&delayed, None, &[4, 1], None).unwrap();
    /// assert_eq!(phase, Some(4));
    /// ```
    pub fn phase(
        &self,
        other: &Signal<T>,
        mask: Option<&Signal<T>>,
        resolutions: &[T],
        period: Option<T>,
    ) -> Result<Option<T>> {
        let Some((&coarse, finer)) = resolutions.split_first() else {
            return Err(SignalError::InvalidParameter(
                "phase search needs at least one resolution".into(),
            ));
        };
        for &resolution in resolutions {
            check_step(resolution)?;
        }
        let (Some(own), Some(theirs)) = (self.elapse(), other.elapse()) else {
            return Ok(None);
        };
        let (Some(end), Some(start)) = (self.end(), other.start()) else {
            return Ok(None);
        };

        let points = self.sweep(other, mask, start - end, coarse, own + theirs, false);
        let Some(mut best) = best_shift(&points) else {
            return Ok(None);
        };
        debug!("phase: coarse best shift {best} at resolution {coarse}");

        let mut previous = coarse;
        for &resolution in finer {
            // Whole steps on each side of the best shift, so it stays on the grid
            let window = previous.to_f64() * REFINE_WINDOW;
            let half_steps = (window / 2.0 / resolution.to_f64()).floor();
            let first = best - resolution * T::from_f64(half_steps);
            let width = resolution * T::from_f64(2.0 * half_steps);
            let points = self.sweep(other, mask, first, resolution, width, false);
            if let Some(refined) = best_shift(&points) {
                best = refined;
            }
            debug!("phase: refined shift {best} at resolution {resolution}");
            previous = resolution;
        }

        Ok(Some(match period {
            Some(period) => fold(best, period),
            None => best,
        }))
    }
}

fn check_step<T: Time>(step: T) -> Result<()> {
    if step > T::ZERO {
        Ok(())
    } else {
        Err(SignalError::InvalidParameter(format!(
            "correlation step must be positive, got {step}"
        )))
    }
}

/// Shift of the first point with the highest score.
fn best_shift<T: Time>(points: &[CorrelationPoint<T>]) -> Option<T> {
    let mut best: Option<&CorrelationPoint<T>> = None;
    for point in points {
        if best.is_none_or(|b| point.score > b.score) {
            best = Some(point);
        }
    }
    best.map(|p| p.shift)
}

/// Folds `phase` into `[-period/2, period/2)`.
fn fold<T: Time>(phase: T, period: T) -> T {
    let period = period.to_f64();
    let half = period / 2.0;
    T::from_f64((phase.to_f64() + half).rem_euclid(period) - half)
}
