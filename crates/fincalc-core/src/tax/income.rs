use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::brackets::TaxSchedule;
use crate::error::FinCalcError;
use crate::policy::TaxableIncomeFloor;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxInput {
    pub gross_income: Money,
    #[serde(default)]
    pub deductions: Money,
}

/// Tax charged inside one bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandTax {
    pub lower_bound: Money,
    pub upper_bound: Option<Money>,
    pub marginal_rate: Rate,
    pub income_in_band: Money,
    pub tax: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    pub taxable_income: Money,
    pub tax_amount: Money,
    pub net_income: Money,
    /// `tax_amount / gross_income`
    pub effective_rate: Rate,
    /// Rate of the bracket holding the last unit of taxable income.
    pub marginal_rate: Rate,
    pub breakdown: Vec<BandTax>,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Walk the schedule and tax each slice of income at its bracket's rate.
///
/// Taxable income is `gross_income - deductions`. Under
/// [`TaxableIncomeFloor::Unfloored`] a negative value is handed to the first
/// bracket as a negative slice, so a non-zero first rate yields a negative
/// contribution.
pub fn compute_tax(
    gross_income: Money,
    deductions: Money,
    schedule: &TaxSchedule,
    floor: TaxableIncomeFloor,
) -> TaxResult {
    let mut taxable_income = gross_income - deductions;
    if floor == TaxableIncomeFloor::Zero && taxable_income < Decimal::ZERO {
        taxable_income = Decimal::ZERO;
    }

    let mut breakdown = Vec::new();
    let mut tax_amount = Decimal::ZERO;

    for (i, band) in schedule.bands().iter().enumerate() {
        let ceiling = match band.upper_bound {
            Some(upper) => taxable_income.min(upper),
            None => taxable_income,
        };
        let income_in_band = if i == 0 && taxable_income < Decimal::ZERO {
            taxable_income
        } else {
            (ceiling - band.lower_bound).max(Decimal::ZERO)
        };

        if income_in_band.is_zero() {
            continue;
        }

        let tax = income_in_band * band.marginal_rate;
        tax_amount += tax;
        breakdown.push(BandTax {
            lower_bound: band.lower_bound,
            upper_bound: band.upper_bound,
            marginal_rate: band.marginal_rate,
            income_in_band,
            tax,
        });
    }

    let effective_rate = if gross_income.is_zero() {
        Decimal::ZERO
    } else {
        tax_amount / gross_income
    };

    debug!(
        schedule = schedule.name(),
        taxable_income = %taxable_income,
        tax_amount = %tax_amount,
        "computed progressive tax"
    );

    TaxResult {
        taxable_income,
        tax_amount,
        net_income: gross_income - tax_amount,
        effective_rate,
        marginal_rate: schedule.band_for(taxable_income).marginal_rate,
        breakdown,
    }
}

/// Validate the input, compute tax against `schedule` and wrap the result.
pub fn calculate_tax(
    input: &TaxInput,
    schedule: &TaxSchedule,
    floor: TaxableIncomeFloor,
) -> FinCalcResult<ComputationOutput<TaxResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.gross_income <= Decimal::ZERO {
        return Err(FinCalcError::invalid("gross_income", "gross_income must be > 0"));
    }
    if input.deductions < Decimal::ZERO {
        return Err(FinCalcError::invalid("deductions", "deductions must be >= 0"));
    }

    if input.deductions > input.gross_income {
        warn!(
            gross_income = %input.gross_income,
            deductions = %input.deductions,
            ?floor,
            "deductions exceed gross income"
        );
        warnings.push(match floor {
            TaxableIncomeFloor::Unfloored => {
                "Deductions exceed gross income; taxable income is negative".to_string()
            }
            TaxableIncomeFloor::Zero => {
                "Deductions exceed gross income; taxable income floored at zero".to_string()
            }
        });
    }

    let result = compute_tax(input.gross_income, input.deductions, schedule, floor);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Progressive marginal brackets (each band taxes only the income inside it)",
        &serde_json::json!({
            "schedule": schedule.name(),
            "gross_income": input.gross_income.to_string(),
            "deductions": input.deductions.to_string(),
            "taxable_income_floor": floor,
        }),
        warnings,
        elapsed,
        result,
    ))
}
