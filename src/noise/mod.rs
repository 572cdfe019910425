//! Noise sources used to perturb signal timing.

mod gaussian;

pub use gaussian::GaussianNoise;
