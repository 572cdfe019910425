//! Boolean combination of signals.
//!
//! `binary_op` is the general two-input sweep; `xor` has its own merge
//! because XOR toggles on every edge of either input. Inversion only flips
//! the start level. `&`, `|`, `^` and `!` are implemented for signal
//! references.

mod intersect;
mod ops;

pub use intersect::{Intersection, Span, intersect};
pub use ops::{BinaryOp, binary_op, xor};
