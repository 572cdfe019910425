//! Line codes built on signals.
//!
//! This module contains symbol-template modulation, pulse-width modulation
//! and an asynchronous serial line, each with an encoder and a decoder.

mod error;
mod pwm;
mod serial;
mod symbol;

pub use error::CodecError;
pub use pwm::{Bits, PwmConfig, PwmDecode, PwmDecoded, bin2pwm, pwm2bin};
pub use serial::{Parity, RxChar, RxStatus, SerialConfig, serial_rx, serial_tx};
pub use symbol::{code2mod, mod2code};
