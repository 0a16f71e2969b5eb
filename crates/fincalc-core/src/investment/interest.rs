use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use super::MAX_TERM_YEARS;
use crate::time_value::{checked_add, checked_mul, fv, growth_factor};
use crate::types::{percent_to_rate, with_metadata, ComputationOutput, Money, Percent};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How often interest is credited to the balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundingFrequency {
    #[default]
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
    Daily,
}

impl CompoundingFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            CompoundingFrequency::Annually => 1,
            CompoundingFrequency::SemiAnnually => 2,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Daily => 365,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInterestInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub years: u32,
    #[serde(default)]
    pub frequency: CompoundingFrequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearBalance {
    pub year: u32,
    pub balance: Money,
    pub interest_earned: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundInterestOutput {
    pub maturity_amount: Money,
    pub interest_earned: Money,
    pub effective_annual_rate: Decimal,
    pub yearly: Vec<YearBalance>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleInterestInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    /// Duration in years; fractional years are allowed.
    pub years: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleInterestOutput {
    pub interest: Money,
    pub total_amount: Money,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

fn validate_growth(principal: Money, annual_rate_percent: Percent) -> FinCalcResult<()> {
    if principal <= Decimal::ZERO {
        return Err(FinCalcError::invalid("principal", "principal must be > 0"));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(FinCalcError::invalid(
            "annual_rate_percent",
            "annual_rate_percent must be >= 0",
        ));
    }
    Ok(())
}

/// `A = P·(1 + r/m)^(m·t)`, with a balance snapshot at the end of every year.
pub fn compound_interest(
    input: &CompoundInterestInput,
) -> FinCalcResult<ComputationOutput<CompoundInterestOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    validate_growth(input.principal, input.annual_rate_percent)?;

    if input.years > MAX_TERM_YEARS {
        return Err(FinCalcError::invalid(
            "years",
            format!("years must be <= {MAX_TERM_YEARS}"),
        ));
    }

    let m = input.frequency.periods_per_year();
    let periods = m
        .checked_mul(input.years)
        .ok_or_else(|| FinCalcError::invalid("years", "too many compounding periods"))?;
    let period_rate = percent_to_rate(input.annual_rate_percent) / Decimal::from(m);
    let yearly_factor = growth_factor(period_rate, m)?;

    // Whole-term value first, so an unrepresentable maturity fails before the table is built.
    let maturity_amount = -fv(period_rate, periods, Decimal::ZERO, input.principal)?;

    let mut yearly = Vec::with_capacity(input.years as usize);
    let mut balance = input.principal;
    for year in 1..=input.years {
        let next = checked_mul(balance, yearly_factor, "year-end balance")?;
        yearly.push(YearBalance {
            year,
            balance: next,
            interest_earned: next - balance,
        });
        balance = next;
    }

    let output = CompoundInterestOutput {
        maturity_amount,
        interest_earned: maturity_amount - input.principal,
        effective_annual_rate: yearly_factor - Decimal::ONE,
        yearly,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Periodic compounding: P(1 + r/m)^(mt)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// `I = P·R·T / 100`
pub fn simple_interest(
    input: &SimpleInterestInput,
) -> FinCalcResult<ComputationOutput<SimpleInterestOutput>> {
    let start = Instant::now();

    validate_growth(input.principal, input.annual_rate_percent)?;
    if input.years < Decimal::ZERO {
        return Err(FinCalcError::invalid("years", "years must be >= 0"));
    }

    let rate = percent_to_rate(input.annual_rate_percent);
    let annual = checked_mul(input.principal, rate, "annual interest")?;
    let interest = checked_mul(annual, input.years, "interest")?;
    let output = SimpleInterestOutput {
        interest,
        total_amount: checked_add(input.principal, interest, "total amount")?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata("Simple interest: PRT/100", input, Vec::new(), elapsed, output))
}
