use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::emi::monthly_rate;
use crate::error::FinCalcError;
use crate::time_value::{checked_add, checked_mul, pv};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FinCalcResult;

/// How much can be borrowed for a given monthly installment budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub monthly_budget: Money,
    pub annual_rate_percent: Percent,
    pub term_periods: u32,
    #[serde(default)]
    pub down_payment: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    pub max_principal: Money,
    pub max_purchase_price: Money,
    pub total_payment: Money,
    pub total_interest: Money,
}

/// Largest principal whose EMI fits the budget: the present value of the
/// budget annuity at the monthly rate.
pub fn loan_affordability(
    input: &AffordabilityInput,
) -> FinCalcResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.monthly_budget <= Decimal::ZERO {
        return Err(FinCalcError::invalid("monthly_budget", "monthly_budget must be > 0"));
    }
    if input.annual_rate_percent < Decimal::ZERO {
        return Err(FinCalcError::invalid(
            "annual_rate_percent",
            "annual_rate_percent must be >= 0",
        ));
    }
    if input.term_periods == 0 {
        return Err(FinCalcError::invalid("term_periods", "term_periods must be > 0"));
    }
    if input.down_payment < Decimal::ZERO {
        return Err(FinCalcError::invalid("down_payment", "down_payment must be >= 0"));
    }

    let r = monthly_rate(input.annual_rate_percent);
    let max_principal = pv(r, input.term_periods, -input.monthly_budget, Decimal::ZERO)?;
    let total_payment = checked_mul(
        input.monthly_budget,
        Decimal::from(input.term_periods),
        "total of installments",
    )?;

    if input.annual_rate_percent.is_zero() {
        warnings.push("Zero interest rate: principal equals the sum of installments".into());
    }

    let max_purchase_price = checked_add(max_principal, input.down_payment, "purchase price")?;

    let output = AffordabilityOutput {
        max_principal,
        max_purchase_price,
        total_payment,
        total_interest: total_payment - max_principal,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Present value of the installment annuity",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::compute_emi;
    use crate::policy::ZeroRatePolicy;
    use rust_decimal_macros::dec;

    #[test]
    fn test_affordability_inverts_emi() {
        let input = AffordabilityInput {
            monthly_budget: dec!(2000),
            annual_rate_percent: dec!(8.5),
            term_periods: 60,
            down_payment: dec!(5000),
        };
        let out = loan_affordability(&input).unwrap().result;
        let emi = compute_emi(out.max_principal, dec!(8.5), 60, ZeroRatePolicy::Singular).unwrap();
        assert!((emi - dec!(2000)).abs() < dec!(0.0001));
        assert_eq!(out.max_purchase_price, out.max_principal + dec!(5000));
        assert!(out.total_interest > Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_budget_is_linear() {
        let input = AffordabilityInput {
            monthly_budget: dec!(100),
            annual_rate_percent: dec!(0),
            term_periods: 24,
            down_payment: dec!(0),
        };
        let out = loan_affordability(&input).unwrap();
        assert_eq!(out.result.max_principal, dec!(2400));
        assert_eq!(out.result.total_interest, dec!(0));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_budget_beyond_decimal_range_is_an_error() {
        let input = AffordabilityInput {
            monthly_budget: Decimal::MAX,
            annual_rate_percent: dec!(0),
            term_periods: 24,
            down_payment: dec!(0),
        };
        assert!(matches!(
            loan_affordability(&input),
            Err(FinCalcError::FinancialImpossibility(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive_budget() {
        let input = AffordabilityInput {
            monthly_budget: dec!(0),
            annual_rate_percent: dec!(5),
            term_periods: 24,
            down_payment: dec!(0),
        };
        assert!(matches!(
            loan_affordability(&input),
            Err(FinCalcError::InvalidInput { .. })
        ));
    }
}
