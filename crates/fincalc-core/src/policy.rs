//! Edge-case policies for the loan and tax engines.
//!
//! Both engines were observed without guards for a zero interest rate and
//! for deductions larger than income. Each guard is an explicit switch so
//! callers choose the semantics instead of inheriting an accident.

use serde::{Deserialize, Serialize};

/// What `compute_emi` does when the periodic rate is exactly zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroRatePolicy {
    /// Evaluate the annuity formula as written. `(1+r)^n - 1` is zero, so the
    /// result is a `DivisionByZero` error.
    #[default]
    Singular,
    /// Special-case `r == 0` to an even split: `principal / term_periods`.
    Straight,
}

/// Whether taxable income is clamped at zero before the bracket walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxableIncomeFloor {
    /// `gross - deductions` is used as-is, negative values included.
    #[default]
    Unfloored,
    /// Negative taxable income is raised to zero.
    Zero,
}
