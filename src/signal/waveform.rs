//! The sparse edge-list signal representation.
//!
//! A signal is stored as the level it holds at its start plus the ordered
//! list of instants at which that level toggles. Nothing is sampled: all
//! operations work on the edge list directly.

use super::error::{Result, SignalError};
use crate::Time;

/// A two-level signal over a closed time domain, or the void signal.
///
/// `Void` stands for "no data". Every operation accepts it and propagates it
/// as a normal outcome rather than an error.
///
/// # Examples
///
/// ```
/// use edgewise::Signal;
///
/// let pulse = Signal::new(0, vec![2, 5], 10, false).unwrap();
/// assert_eq!(pulse.level(3, 0).0, Some(true));
/// assert_eq!(pulse.level(7, 0).0, Some(false));
/// assert_eq!(pulse.level(11, 0).0, None);
/// ```
#[derive(Debug, PartialEq)]
pub enum Signal<T: Time = f64> {
    /// The empty signal.
    Void,
    /// A signal with a valid domain and edge list.
    Present(Waveform<T>),
}

/// The data of a non-void signal.
///
/// Invariants, checked on construction:
/// - `start < end`
/// - `start <= edges[0]` and `edges[last] <= end`
/// - edges strictly ascending
#[derive(Debug, PartialEq)]
pub struct Waveform<T: Time> {
    pub(crate) start: T,
    pub(crate) edges: Vec<T>,
    pub(crate) end: T,
    /// Level held on `[start, edges[0])`.
    pub(crate) slevel: bool,
    /// Time units per second.
    pub(crate) tscale: f64,
}

impl<T: Time> Clone for Signal<T> {
    fn clone(&self) -> Self {
        match self {
            Signal::Void => Signal::Void,
            Signal::Present(w) => Signal::Present(w.clone()),
        }
    }

    /// Overwrites `self` with a copy of `source`, reusing the edge buffer
    /// when both are present.
    fn clone_from(&mut self, source: &Self) {
        match (self, source) {
            (Signal::Present(target), Signal::Present(w)) => target.clone_from(w),
            (target, source) => *target = source.clone(),
        }
    }
}

impl<T: Time> Clone for Waveform<T> {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            edges: self.edges.clone(),
            end: self.end,
            slevel: self.slevel,
            tscale: self.tscale,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.start = source.start;
        self.edges.clone_from(&source.edges);
        self.end = source.end;
        self.slevel = source.slevel;
        self.tscale = source.tscale;
    }
}

impl<T: Time> Default for Signal<T> {
    fn default() -> Self {
        Signal::Void
    }
}

impl<T: Time> Waveform<T> {
    /// Creates a waveform, validating every invariant.
    pub fn new(start: T, edges: Vec<T>, end: T, slevel: bool, tscale: f64) -> Result<Self> {
        let waveform = Self {
            start,
            edges,
            end,
            slevel,
            tscale,
        };
        waveform.validate()?;
        Ok(waveform)
    }

    /// Builds a waveform whose invariants the caller already guarantees.
    pub(crate) fn from_parts(start: T, edges: Vec<T>, end: T, slevel: bool, tscale: f64) -> Self {
        let waveform = Self {
            start,
            edges,
            end,
            slevel,
            tscale,
        };
        debug_assert!(waveform.validate().is_ok(), "{:?}", waveform.validate());
        waveform
    }

    /// Checks the waveform invariants.
    pub fn validate(&self) -> Result<()> {
        if !self.start.is_finite() {
            return Err(SignalError::NonFiniteTime {
                field: "start",
                value: self.start.to_f64(),
            });
        }
        if !self.end.is_finite() {
            return Err(SignalError::NonFiniteTime {
                field: "end",
                value: self.end.to_f64(),
            });
        }
        if !self.tscale.is_finite() || self.tscale <= 0.0 {
            return Err(SignalError::InvalidParameter(format!(
                "tscale must be positive and finite, got {}",
                self.tscale
            )));
        }
        if self.start >= self.end {
            return Err(SignalError::EmptyDomain {
                start: self.start.to_f64(),
                end: self.end.to_f64(),
            });
        }

        for (index, &edge) in self.edges.iter().enumerate() {
            if !edge.is_finite() {
                return Err(SignalError::NonFiniteTime {
                    field: "edge",
                    value: edge.to_f64(),
                });
            }
            if index > 0 && self.edges[index - 1] >= edge {
                return Err(SignalError::NonAscending {
                    index,
                    previous: self.edges[index - 1].to_f64(),
                    current: edge.to_f64(),
                });
            }
        }

        if let Some(&first) = self.edges.first() {
            if first < self.start {
                return Err(SignalError::EdgeBeforeStart {
                    edge: first.to_f64(),
                    start: self.start.to_f64(),
                });
            }
        }
        if let Some(&last) = self.edges.last() {
            if last > self.end {
                return Err(SignalError::EdgeAfterEnd {
                    edge: last.to_f64(),
                    end: self.end.to_f64(),
                });
            }
        }
        Ok(())
    }

    pub fn start(&self) -> T {
        self.start
    }

    pub fn end(&self) -> T {
        self.end
    }

    pub fn edges(&self) -> &[T] {
        &self.edges
    }

    pub fn slevel(&self) -> bool {
        self.slevel
    }

    pub fn tscale(&self) -> f64 {
        self.tscale
    }

    pub fn elapse(&self) -> T {
        self.end - self.start
    }

    /// Level at `time`, scanning forward from edge index `hint`.
    ///
    /// See [`Signal::level`].
    pub fn level(&self, time: T, hint: usize) -> (Option<bool>, usize) {
        if time < self.start || time > self.end {
            return (None, hint);
        }
        let mut position = hint.min(self.edges.len());
        while position < self.edges.len() && self.edges[position] <= time {
            position += 1;
        }
        (Some(self.slevel ^ odd(position)), position)
    }

    /// Level held after all edges.
    pub fn end_level(&self) -> bool {
        self.slevel ^ odd(self.edges.len())
    }

    /// Level right after the edge at `index`.
    pub(crate) fn level_after(&self, index: usize) -> bool {
        self.slevel ^ odd(index + 1)
    }
}

/// True when `count` is odd, i.e. when that many toggles invert a level.
pub(crate) fn odd(count: usize) -> bool {
    count & 1 == 1
}

impl<T: Time> Signal<T> {
    /// Creates a validated signal with a time scale of 1.
    ///
    /// # Arguments
    ///
    /// * `start` - First instant of the domain
    /// * `edges` - Strictly ascending toggle times within `[start, end]`
    /// * `end` - Last instant of the domain, strictly after `start`
    /// * `slevel` - Level held before the first edge
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant, with the offending values.
    pub fn new(start: T, edges: Vec<T>, end: T, slevel: bool) -> Result<Self> {
        Self::with_tscale(start, edges, end, slevel, 1.0)
    }

    /// Creates a validated signal with an explicit time scale
    /// (time units per second).
    pub fn with_tscale(start: T, edges: Vec<T>, end: T, slevel: bool, tscale: f64) -> Result<Self> {
        Waveform::new(start, edges, end, slevel, tscale).map(Signal::Present)
    }

    /// Creates an edge-free signal holding `level` over `[start, end]`.
    pub fn constant(start: T, end: T, level: bool) -> Result<Self> {
        Self::new(start, Vec::new(), end, level)
    }

    /// The void signal.
    pub fn void() -> Self {
        Signal::Void
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Signal::Void)
    }

    /// The underlying waveform, if any.
    pub fn waveform(&self) -> Option<&Waveform<T>> {
        match self {
            Signal::Void => None,
            Signal::Present(w) => Some(w),
        }
    }

    /// Re-checks every invariant. The void signal is always valid.
    pub fn validate(&self) -> Result<()> {
        match self {
            Signal::Void => Ok(()),
            Signal::Present(w) => w.validate(),
        }
    }

    pub fn start(&self) -> Option<T> {
        self.waveform().map(Waveform::start)
    }

    pub fn end(&self) -> Option<T> {
        self.waveform().map(Waveform::end)
    }

    /// Edge times; empty for the void signal.
    pub fn edges(&self) -> &[T] {
        match self {
            Signal::Void => &[],
            Signal::Present(w) => &w.edges,
        }
    }

    pub fn slevel(&self) -> Option<bool> {
        self.waveform().map(Waveform::slevel)
    }

    pub fn tscale(&self) -> Option<f64> {
        self.waveform().map(Waveform::tscale)
    }

    /// Length of the domain.
    pub fn elapse(&self) -> Option<T> {
        self.waveform().map(Waveform::elapse)
    }

    /// Returns the level at `time` and the edge position to pass as the
    /// next hint.
    ///
    /// The scan only moves forward from `hint`: edges at or before `time`
    /// are counted, so an edge exactly at `time` has already taken effect.
    /// Successive queries must use non-decreasing times and feed back the
    /// returned position; a sequence of queries then costs linear time in
    /// the edge count. The level is `None` outside `[start, end]` and for
    /// the void signal.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgewise::Signal;
    ///
    /// let s = Signal::new(0.0, vec![1.0, 2.0, 3.0], 4.0, false).unwrap();
    /// let (level, hint) = s.level(1.5, 0);
    /// assert_eq!(level, Some(true));
    /// let (level, _) = s.level(3.0, hint);
    /// assert_eq!(level, Some(true));
    /// ```
    pub fn level(&self, time: T, hint: usize) -> (Option<bool>, usize) {
        match self {
            Signal::Void => (None, hint),
            Signal::Present(w) => w.level(time, hint),
        }
    }

    /// Level at `end`, in constant time.
    pub fn end_level(&self) -> Option<bool> {
        self.waveform().map(Waveform::end_level)
    }

    /// Evaluates the level at each of `times`, which must be non-decreasing.
    pub fn sample(&self, times: &[T]) -> Vec<Option<bool>> {
        let mut hint = 0;
        times
            .iter()
            .map(|&t| {
                let (level, next) = self.level(t, hint);
                hint = next;
                level
            })
            .collect()
    }

    /// Iterates over the constant-level intervals `(from, to, level)`.
    ///
    /// This is the read-only view rendering consumers draw from.
    pub fn segments(&self) -> Segments<'_, T> {
        Segments {
            waveform: self.waveform(),
            index: 0,
        }
    }
}

/// Iterator over the constant-level intervals of a signal.
pub struct Segments<'a, T: Time> {
    waveform: Option<&'a Waveform<T>>,
    index: usize,
}

impl<T: Time> Iterator for Segments<'_, T> {
    type Item = (T, T, bool);

    fn next(&mut self) -> Option<Self::Item> {
        let w = self.waveform?;
        let count = w.edges.len();
        while self.index <= count {
            let i = self.index;
            self.index += 1;
            let from = if i == 0 { w.start } else { w.edges[i - 1] };
            let to = if i == count { w.end } else { w.edges[i] };
            if from < to {
                return Some((from, to, w.slevel ^ odd(i)));
            }
        }
        None
    }
}

/// Accumulates edges from a sequence of level assignments.
///
/// Setting the current level is a no-op. Two toggles at the same instant
/// cancel out.
pub(crate) struct EdgeWriter<T: Time> {
    edges: Vec<T>,
    initial: bool,
    level: bool,
}

impl<T: Time> EdgeWriter<T> {
    pub(crate) fn new(level: bool) -> Self {
        Self {
            edges: Vec::new(),
            initial: level,
            level,
        }
    }

    pub(crate) fn set(&mut self, time: T, level: bool) {
        if level == self.level {
            return;
        }
        self.level = level;
        if self.edges.last() == Some(&time) {
            self.edges.pop();
        } else {
            self.edges.push(time);
        }
    }

    pub(crate) fn finish(self, start: T, end: T, tscale: f64) -> Waveform<T> {
        Waveform::from_parts(start, self.edges, end, self.initial, tscale)
    }
}
