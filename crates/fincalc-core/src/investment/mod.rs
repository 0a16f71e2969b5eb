//! Savings and investment growth calculators.

pub mod interest;
pub mod sip;

/// Longest horizon the growth calculators accept, in years.
pub const MAX_TERM_YEARS: u32 = 1000;

pub use interest::{compound_interest, simple_interest, CompoundingFrequency};
pub use sip::sip;
