//! Errors raised by the protocol codecs.

use crate::signal::SignalError;

/// Errors that can occur while encoding or decoding a line signal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("symbol code {code} out of range: {count} symbols defined")]
    UnknownSymbol { code: usize, count: usize },

    #[error("symbol {0} is void")]
    VoidSymbol(usize),

    #[error("no symbols defined")]
    EmptySymbolSet,

    #[error("symbol {index} lasts {elapse}, expected {period}")]
    SymbolPeriodMismatch {
        index: usize,
        elapse: f64,
        period: f64,
    },

    #[error("{0} bits do not fit in a 64-bit word")]
    TooManyBits(usize),

    #[error("{chars} characters but {times} send times")]
    LengthMismatch { chars: usize, times: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown parity mode: '{0}'")]
    UnknownParity(String),

    #[error(transparent)]
    Signal(#[from] SignalError),
}
