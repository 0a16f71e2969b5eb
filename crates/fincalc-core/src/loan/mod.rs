//! Amortized-loan engine: fixed periodic payment (EMI), amortization
//! schedules and the inverse affordability calculation.

pub mod affordability;
pub mod emi;
pub mod schedule;

pub use emi::{calculate_loan, compute_emi, monthly_rate, LoanInput, LoanResult};
