use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use super::MAX_TERM_YEARS;
use crate::time_value::{checked_mul, fv};
use crate::types::{percent_to_rate, with_metadata, ComputationOutput, Money, Percent};
use crate::FinCalcResult;

fn default_true() -> bool {
    true
}

/// Systematic investment plan: a fixed contribution every month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipInput {
    pub monthly_investment: Money,
    /// Expected annual return in percent.
    pub expected_return_percent: Percent,
    pub years: u32,
    /// Contributions made at the start of each month (annuity due).
    #[serde(default = "default_true")]
    pub invest_at_start: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipOutput {
    pub invested_amount: Money,
    pub estimated_returns: Money,
    pub future_value: Money,
}

/// Future value of monthly contributions compounded at `return / 12`.
pub fn sip(input: &SipInput) -> FinCalcResult<ComputationOutput<SipOutput>> {
    let start = Instant::now();

    if input.monthly_investment <= Decimal::ZERO {
        return Err(FinCalcError::invalid(
            "monthly_investment",
            "monthly_investment must be > 0",
        ));
    }
    if input.expected_return_percent < Decimal::ZERO {
        return Err(FinCalcError::invalid(
            "expected_return_percent",
            "expected_return_percent must be >= 0",
        ));
    }
    if input.years == 0 || input.years > MAX_TERM_YEARS {
        return Err(FinCalcError::invalid(
            "years",
            format!("years must be between 1 and {MAX_TERM_YEARS}"),
        ));
    }

    let months = input
        .years
        .checked_mul(12)
        .ok_or_else(|| FinCalcError::invalid("years", "too many months"))?;
    let monthly_rate = percent_to_rate(input.expected_return_percent) / dec!(12);

    let mut future_value = fv(monthly_rate, months, -input.monthly_investment, Decimal::ZERO)?;
    if input.invest_at_start {
        let due_factor = Decimal::ONE + monthly_rate;
        future_value = checked_mul(future_value, due_factor, "SIP future value")?;
    }

    let invested_amount = checked_mul(
        input.monthly_investment,
        Decimal::from(months),
        "invested amount",
    )?;
    let output = SipOutput {
        invested_amount,
        estimated_returns: future_value - invested_amount,
        future_value,
    };

    let methodology = if input.invest_at_start {
        "SIP future value, annuity due: P[((1+i)^n - 1)/i](1+i)"
    } else {
        "SIP future value, ordinary annuity: P[((1+i)^n - 1)/i]"
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, Vec::new(), elapsed, output))
}
