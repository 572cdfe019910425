//! Binary signals stored as edge lists.
//!
//! This module provides:
//! - `Signal`, the void-or-present signal value, and its `Waveform` data
//! - level queries with the forward-scanning hint protocol
//! - shift, reverse, split, join, chop and jitter, each in an in-place and
//!   a value-returning form
//! - `SignalError` for construction and join failures

mod error;
mod jitter;
mod transform;
mod waveform;

pub use error::{Result, SignalError};
pub(crate) use waveform::{EdgeWriter, odd};
pub use waveform::{Segments, Signal, Waveform};
