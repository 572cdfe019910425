//! Errors raised by signal construction and combination.

/// Result type for signal operations.
pub type Result<T> = std::result::Result<T, SignalError>;

/// Errors that can occur while building or combining signals.
///
/// Time values are reported as `f64` regardless of the signal's time type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SignalError {
    #[error("{field} is not a finite time: {value}")]
    NonFiniteTime { field: &'static str, value: f64 },

    #[error("empty domain: start {start} is not before end {end}")]
    EmptyDomain { start: f64, end: f64 },

    #[error("edge {edge} lies before start {start}")]
    EdgeBeforeStart { edge: f64, start: f64 },

    #[error("edge {edge} lies after end {end}")]
    EdgeAfterEnd { edge: f64, end: f64 },

    #[error("edges not strictly ascending at index {index}: {previous} then {current}")]
    NonAscending {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("cannot join overlapping signals: end {end} is after start {start}")]
    Overlap { end: f64, start: f64 },

    #[error("cannot join signals: end level {end_level} differs from start level {start_level}")]
    LevelMismatch { end_level: bool, start_level: bool },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
