//! Choosing which rule to apply next
//!
//! [`UniformDriver`] picks any applicable candidate. [`TendencyDriver`] keeps
//! a set of directional tendencies alive across generations, so that related
//! changes cluster the way they do in attested languages.

pub mod tendency;
pub mod uniform;

pub use tendency::{
    FinalDevoicing, IntervocalicLenition, Tendency, TendencyDriver, VowelRaising,
};
pub use uniform::{narrow_rule, UniformDriver};

/// Clamp a configured chance into `gen_bool`'s domain
pub(crate) fn chance(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}
