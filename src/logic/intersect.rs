//! Common domain of two signals.

use crate::Time;
use crate::signal::{Signal, Waveform, odd};

/// The shared domain of two signals and the edges of each inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection<T: Time> {
    /// Later of the two starts.
    pub start: T,
    /// Earlier of the two ends.
    pub end: T,
    pub a: Span,
    pub b: Span,
}

/// The edges of one operand that fall strictly inside an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Index of the first edge after the domain start.
    pub lo: usize,
    /// Index one past the last edge before the domain end.
    pub hi: usize,
    /// Level of the operand at the domain start.
    pub level: bool,
}

impl Span {
    fn within<T: Time>(w: &Waveform<T>, start: T, end: T) -> Self {
        let lo = w.edges.partition_point(|&e| e <= start);
        let hi = w.edges.partition_point(|&e| e < end).max(lo);
        Self {
            lo,
            hi,
            level: w.slevel ^ odd(lo),
        }
    }

    /// True when the operand does not toggle inside the domain.
    pub fn is_constant(&self) -> bool {
        self.lo == self.hi
    }

    /// The spanned edges of `w`.
    pub fn edges<'a, T: Time>(&self, w: &'a Waveform<T>) -> &'a [T] {
        &w.edges[self.lo..self.hi]
    }
}

impl<T: Time> Intersection<T> {
    /// Intersects two waveforms. `None` when their domains do not overlap.
    pub fn of(a: &Waveform<T>, b: &Waveform<T>) -> Option<Self> {
        let start = a.start.later(b.start);
        let end = a.end.earlier(b.end);
        if start >= end {
            return None;
        }
        Some(Self {
            start,
            end,
            a: Span::within(a, start, end),
            b: Span::within(b, start, end),
        })
    }
}

/// Intersects two signals. `None` when either is void or their domains do
/// not overlap.
///
/// Edges sitting exactly on the common start are folded into the operand's
/// start level; edges exactly on the common end are outside the span.
pub fn intersect<T: Time>(a: &Signal<T>, b: &Signal<T>) -> Option<Intersection<T>> {
    match (a, b) {
        (Signal::Present(a), Signal::Present(b)) => Intersection::of(a, b),
        _ => None,
    }
}
