//! Measurements on signals: level integrals, agreement, correlation and
//! phase search.

mod correlation;
mod integral;

pub use correlation::CorrelationPoint;
