//! Primitive signal transforms: shift, reverse, split, join and chop.
//!
//! Each transform comes in two forms. The `&mut self` form rewrites the
//! signal in place; the `&self` form leaves it untouched and returns a new,
//! independent signal.

use super::error::{Result, SignalError};
use super::waveform::{Signal, Waveform, odd};
use crate::Time;

impl<T: Time> Signal<T> {
    /// Moves the signal by `offset` in place. No-op on a void signal.
    pub fn shift(&mut self, offset: T) {
        if let Signal::Present(w) = self {
            w.start = w.start + offset;
            w.end = w.end + offset;
            for edge in w.edges.iter_mut() {
                *edge = *edge + offset;
            }
        }
    }

    /// Returns a copy moved by `offset`.
    pub fn shifted(&self, offset: T) -> Self {
        let mut shifted = self.clone();
        shifted.shift(offset);
        shifted
    }

    /// Mirrors the signal in time about the middle of its domain, in place.
    ///
    /// Each edge `e` becomes `start + end - e`. The new start level is the
    /// old end level.
    pub fn reverse(&mut self) {
        if let Signal::Present(w) = self {
            let pivot = w.start + w.end;
            let (start, end) = (w.start, w.end);
            w.slevel = w.end_level();
            for edge in w.edges.iter_mut() {
                *edge = (pivot - *edge).later(start).earlier(end);
            }
            w.edges.reverse();
        }
    }

    /// Returns a time-mirrored copy.
    pub fn reversed(&self) -> Self {
        let mut reversed = self.clone();
        reversed.reverse();
        reversed
    }

    /// Splits at `time`, keeping the older part in `self` and returning
    /// the newer part.
    ///
    /// Edges exactly at `time` go to the newer part. Splitting at or before
    /// the start moves the whole signal out and leaves `self` void;
    /// splitting at or after the end returns a void signal.
    pub fn split_off(&mut self, time: T) -> Self {
        let Signal::Present(w) = self else {
            return Signal::Void;
        };
        if time <= w.start {
            return std::mem::take(self);
        }
        if time >= w.end {
            return Signal::Void;
        }

        let index = w.edges.partition_point(|&e| e < time);
        let newer = Waveform::from_parts(
            time,
            w.edges.split_off(index),
            w.end,
            w.slevel ^ odd(index),
            w.tscale,
        );
        w.end = time;
        Signal::Present(newer)
    }

    /// Splits at `time` into `(older, newer)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgewise::Signal;
    ///
    /// let s = Signal::new(0, vec![2, 5], 10, false).unwrap();
    /// let (older, newer) = s.split(5);
    /// assert_eq!(older.edges(), &[2]);
    /// assert_eq!(newer.edges(), &[5]);
    /// assert_eq!(newer.slevel(), Some(true));
    /// ```
    pub fn split(&self, time: T) -> (Self, Self) {
        let mut older = self.clone();
        let newer = older.split_off(time);
        (older, newer)
    }

    /// The part of the signal before `time`.
    pub fn older(&self, time: T) -> Self {
        self.split(time).0
    }

    /// The part of the signal from `time` on.
    pub fn newer(&self, time: T) -> Self {
        self.split(time).1
    }

    /// Appends `other` in place, taking ownership of it.
    ///
    /// A gap between `self.end` and `other.start` holds the common boundary
    /// level, so no edge is inserted there. When the two signals meet at an
    /// instant where both carry an edge, the two toggles cancel.
    ///
    /// # Errors
    ///
    /// * [`SignalError::Overlap`] if `self` ends after `other` starts
    /// * [`SignalError::LevelMismatch`] if the end level of `self` is not
    ///   the start level of `other`
    ///
    /// `self` is left unchanged on error.
    pub fn append(&mut self, other: Signal<T>) -> Result<()> {
        let Signal::Present(next) = other else {
            return Ok(());
        };
        let Signal::Present(w) = self else {
            *self = Signal::Present(next);
            return Ok(());
        };

        if w.end > next.start {
            return Err(SignalError::Overlap {
                end: w.end.to_f64(),
                start: next.start.to_f64(),
            });
        }
        if w.end_level() != next.slevel {
            return Err(SignalError::LevelMismatch {
                end_level: w.end_level(),
                start_level: next.slevel,
            });
        }

        let mut incoming = next.edges.as_slice();
        if let (Some(&last), Some(&first)) = (w.edges.last(), incoming.first()) {
            if last == first {
                w.edges.pop();
                incoming = &incoming[1..];
            }
        }
        w.edges.extend_from_slice(incoming);
        w.end = next.end;
        Ok(())
    }

    /// Returns the concatenation of `self` and `other`.
    ///
    /// See [`Signal::append`] for the rules and errors.
    pub fn join(&self, other: &Signal<T>) -> Result<Self> {
        let mut joined = self.clone();
        joined.append(other.clone())?;
        Ok(joined)
    }

    /// Cuts the signal at every `origin + k * period` inside its domain.
    ///
    /// The pieces are contiguous and, apart from the first and last, each
    /// spans exactly one period. At most `max_chops` pieces are returned;
    /// the rest of the signal is dropped. A void signal yields no pieces.
    ///
    /// # Errors
    ///
    /// [`SignalError::InvalidParameter`] if `period` is not positive.
    pub fn chop(&self, period: T, origin: T, max_chops: Option<usize>) -> Result<Vec<Self>> {
        if !(period > T::ZERO) {
            return Err(SignalError::InvalidParameter(format!(
                "chop period must be positive, got {period}"
            )));
        }
        let Signal::Present(w) = self else {
            return Ok(Vec::new());
        };

        let cut_at = |k: i64| origin + period * T::from_f64(k as f64);
        let mut k = ((w.start - origin).to_f64() / period.to_f64()).floor() as i64;
        while cut_at(k) <= w.start {
            k += 1;
        }

        let mut pieces = Vec::new();
        let mut from = w.start;
        let mut index = 0;
        let mut level = w.slevel;
        while max_chops.is_none_or(|max| pieces.len() < max) {
            let cut = cut_at(k);
            let last = cut >= w.end;
            let to = if last { w.end } else { cut };
            let upto = if last {
                w.edges.len()
            } else {
                index + w.edges[index..].partition_point(|&e| e < to)
            };

            pieces.push(Signal::Present(Waveform::from_parts(
                from,
                w.edges[index..upto].to_vec(),
                to,
                level,
                w.tscale,
            )));
            level ^= odd(upto - index);
            index = upto;

            if last {
                break;
            }
            from = cut;
            k += 1;
        }
        Ok(pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse() -> Signal<i64> {
        Signal::new(0, vec![2, 5], 10, false).unwrap()
    }

    #[test]
    fn test_shift() {
        let mut s = pulse();
        s.shift(3);
        assert_eq!(s, Signal::new(3, vec![5, 8], 13, false).unwrap());

        let mut void: Signal<i64> = Signal::Void;
        void.shift(3);
        assert!(void.is_void());
    }

    #[test]
    fn test_shifted_leaves_source() {
        let s = pulse();
        let moved = s.shifted(-2);
        assert_eq!(s.start(), Some(0));
        assert_eq!(moved.edges(), &[0, 3]);
    }

    #[test]
    fn test_reverse() {
        let s = Signal::<i64>::new(0, vec![2, 5, 9], 10, false).unwrap();
        let r = s.reversed();
        assert_eq!(r.edges(), &[1, 5, 8]);
        assert_eq!(r.slevel(), Some(true));
        assert_eq!(r.end_level(), Some(false));
        assert_eq!(r.reversed(), s);
    }

    #[test]
    fn test_reverse_even_edge_count_keeps_level() {
        let r = pulse().reversed();
        assert_eq!(r.edges(), &[5, 8]);
        assert_eq!(r.slevel(), Some(false));
    }

    #[test]
    fn test_split_inside() {
        let (older, newer) = pulse().split(3);
        assert_eq!(older, Signal::new(0, vec![2], 3, false).unwrap());
        assert_eq!(newer, Signal::new(3, vec![5], 10, true).unwrap());
    }

    #[test]
    fn test_split_on_edge_goes_newer() {
        let (older, newer) = pulse().split(2);
        assert_eq!(older, Signal::new(0, vec![], 2, false).unwrap());
        assert_eq!(newer, Signal::new(2, vec![2, 5], 10, false).unwrap());
    }

    #[test]
    fn test_split_boundaries() {
        let s = pulse();
        assert_eq!(s.split(0), (Signal::Void, s.clone()));
        assert_eq!(s.split(-4), (Signal::Void, s.clone()));
        assert_eq!(s.split(10), (s.clone(), Signal::Void));
        assert_eq!(Signal::<i64>::Void.split(1), (Signal::Void, Signal::Void));
    }

    #[test]
    fn test_split_off_in_place() {
        let mut s = pulse();
        let newer = s.split_off(4);
        assert_eq!(s.end(), Some(4));
        assert_eq!(newer.start(), Some(4));
        assert_eq!(s.older(4), s);
    }

    #[test]
    fn test_older_newer() {
        let s = pulse();
        assert_eq!(s.older(6).edges(), &[2, 5]);
        assert_eq!(s.newer(6).edges(), &[] as &[i64]);
        assert_eq!(s.newer(6).slevel(), Some(false));
    }

    #[test]
    fn test_join_round_trip() {
        let s = pulse();
        for t in 1..10 {
            let (older, newer) = s.split(t);
            assert_eq!(older.join(&newer).unwrap(), s, "split at {t}");
        }
    }

    #[test]
    fn test_join_with_gap() {
        let a = Signal::<i64>::new(0, vec![1], 2, false).unwrap();
        let b = Signal::<i64>::new(5, vec![6], 8, true).unwrap();
        let joined = a.join(&b).unwrap();
        assert_eq!(joined, Signal::new(0, vec![1, 6], 8, false).unwrap());
    }

    #[test]
    fn test_join_overlap_fails() {
        let a = Signal::<i64>::new(0, vec![], 5, false).unwrap();
        let b = Signal::<i64>::new(4, vec![], 8, false).unwrap();
        assert_eq!(
            a.join(&b),
            Err(SignalError::Overlap {
                end: 5.0,
                start: 4.0
            })
        );
    }

    #[test]
    fn test_join_level_mismatch_fails() {
        let a = Signal::<i64>::new(0, vec![1], 5, false).unwrap();
        let b = Signal::<i64>::new(5, vec![], 8, false).unwrap();
        let mut target = a.clone();
        assert_eq!(
            target.append(b),
            Err(SignalError::LevelMismatch {
                end_level: true,
                start_level: false
            })
        );
        assert_eq!(target, a);
    }

    #[test]
    fn test_join_cancels_coincident_boundary_edges() {
        let a = Signal::<i64>::new(0, vec![2, 5], 5, false).unwrap();
        let b = Signal::<i64>::new(5, vec![5, 7], 9, false).unwrap();
        let joined = a.join(&b).unwrap();
        assert_eq!(joined, Signal::new(0, vec![2, 7], 9, false).unwrap());
        assert!(joined.validate().is_ok());
    }

    #[test]
    fn test_join_void() {
        let s = pulse();
        assert_eq!(Signal::Void.join(&s).unwrap(), s);
        assert_eq!(s.join(&Signal::Void).unwrap(), s);
    }

    #[test]
    fn test_chop() {
        let pieces = pulse().chop(3, 0, None).unwrap();
        assert_eq!(
            pieces,
            vec![
                Signal::new(0, vec![2], 3, false).unwrap(),
                Signal::new(3, vec![5], 6, true).unwrap(),
                Signal::new(6, vec![], 9, false).unwrap(),
                Signal::new(9, vec![], 10, false).unwrap(),
            ]
        );
    }

    #[test]
    fn test_chop_misaligned_origin() {
        let pieces = pulse().chop(4, 1, None).unwrap();
        let bounds: Vec<_> = pieces
            .iter()
            .map(|p| (p.start().unwrap(), p.end().unwrap()))
            .collect();
        assert_eq!(bounds, vec![(0, 1), (1, 5), (5, 9), (9, 10)]);
    }

    #[test]
    fn test_chop_limit_and_rejoin() {
        let s = pulse();
        assert_eq!(s.chop(2, 0, Some(2)).unwrap().len(), 2);

        let mut rejoined = Signal::Void;
        for piece in s.chop(2, 0, None).unwrap() {
            rejoined.append(piece).unwrap();
        }
        assert_eq!(rejoined, s);
    }

    #[test]
    fn test_chop_rejects_bad_period() {
        assert!(matches!(
            pulse().chop(0, 0, None),
            Err(SignalError::InvalidParameter(_))
        ));
        assert!(Signal::<i64>::Void.chop(1, 0, None).unwrap().is_empty());
    }
}
