//! Distribution Sampler - Statistical Primitives
//!
//! Pure building blocks the rest of the engine composes:
//! - `diurnal`: deterministic day-shaped intensity curve
//! - `envelope`: ramp-up / sustained / ramp-down attack multiplier curve
//! - `split`: exact-sum population splits (Zipf-skewed and attack-concentrated)
//!
//! Every function takes its randomness as an explicit `Rng` so tests can
//! seed deterministically.

pub mod diurnal;
pub mod envelope;
pub mod split;
#[cfg(test)]
mod tests;

pub use diurnal::{diurnal_base, DiurnalShape};
pub use envelope::attack_envelope;
pub use split::{apportion, concentrated_split, skewed_split};
