//! Timestamp types.
//!
//! Every [`Signal`](crate::Signal) is generic over a single `Time` type, so
//! the start, edges and end of one signal always share a numeric kind.

use std::fmt::{Debug, Display};
use std::ops::{Add, Mul, Sub};

/// A numeric timestamp usable as a signal time axis.
///
/// Implemented for `i32` and `i64` (integer ticks) and for `f64` (real time).
pub trait Time:
    Copy
    + PartialOrd
    + Debug
    + Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
{
    /// The zero offset.
    const ZERO: Self;

    /// Converts to `f64`, for scoring and error reporting.
    fn to_f64(self) -> f64;

    /// Converts from `f64`, rounding to the nearest representable value.
    fn from_f64(value: f64) -> Self;

    /// Converts from `f64`, rounding towards negative infinity.
    ///
    /// Used when sampling: the result is the last representable instant at
    /// or before `value`.
    fn floor_from_f64(value: f64) -> Self {
        Self::from_f64(value)
    }

    /// Returns false for NaN and infinities.
    fn is_finite(self) -> bool;

    /// The later of two times.
    fn later(self, other: Self) -> Self {
        if other > self { other } else { self }
    }

    /// The earlier of two times.
    fn earlier(self, other: Self) -> Self {
        if other < self { other } else { self }
    }
}

impl Time for i32 {
    const ZERO: Self = 0;

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        value.round() as i32
    }

    fn floor_from_f64(value: f64) -> Self {
        value.floor() as i32
    }

    fn is_finite(self) -> bool {
        true
    }
}

impl Time for i64 {
    const ZERO: Self = 0;

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        value.round() as i64
    }

    fn floor_from_f64(value: f64) -> Self {
        value.floor() as i64
    }

    fn is_finite(self) -> bool {
        true
    }
}

impl Time for f64 {
    const ZERO: Self = 0.0;

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }

    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}
