//! Edgewise - timed binary signals for Rust
//!
//! A [`Signal`] is a two-level waveform over a finite time domain, stored
//! as its start level and the instants where it toggles. This library
//! provides boolean logic between signals, time transforms, measurements
//! such as duty cycle, correlation and phase, and line codecs (symbol
//! templates, PWM and asynchronous serial) that produce and consume
//! signals.
//!
//! # Examples
//!
//! ```
//! use edgewise::Signal;
//!
//! let clock = Signal::new(0, vec![1, 2, 3], 4, false).unwrap();
//! let enable = Signal::new(0, vec![2], 4, false).unwrap();
//! let gated = &clock & &enable;
//! assert_eq!(gated.edges(), &[3]);
//! ```

pub mod analysis;
pub mod codec;
pub mod logic;
pub mod noise;
pub mod signal;
pub mod time;

// Re-export commonly used types at the crate root
pub use analysis::CorrelationPoint;
pub use codec::{
    Bits, CodecError, Parity, PwmConfig, PwmDecode, PwmDecoded, RxChar, RxStatus, SerialConfig,
    bin2pwm, code2mod, mod2code, pwm2bin, serial_rx, serial_tx,
};
pub use logic::{BinaryOp, Intersection, Span, binary_op, intersect, xor};
pub use noise::GaussianNoise;
pub use signal::{Segments, Signal, SignalError, Waveform};
pub use time::Time;
