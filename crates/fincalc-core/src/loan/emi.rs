use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::FinCalcError;
use crate::policy::ZeroRatePolicy;
use crate::time_value::{checked_div, checked_mul, growth_factor};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::FinCalcResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Loan terms as entered on an EMI calculator form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: Money,
    /// Nominal annual rate in percent (8.5 = 8.5%).
    pub annual_rate_percent: Percent,
    /// Term in months.
    pub term_periods: u32,
}

/// Derived payment figures for a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub periodic_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Monthly fractional rate from an annual percentage: `pct / 100 / 12`.
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / Decimal::ONE_HUNDRED / MONTHS_PER_YEAR
}

/// Equated monthly installment: `P·r·(1+r)^n / ((1+r)^n − 1)`.
///
/// Inputs are not validated here; callers check them first (see
/// [`calculate_loan`]). A zero denominator never panics: it is either
/// reported as [`FinCalcError::DivisionByZero`] or, for a zero rate under
/// [`ZeroRatePolicy::Straight`], replaced by `principal / term_periods`.
pub fn compute_emi(
    principal: Money,
    annual_rate_percent: Percent,
    term_periods: u32,
    policy: ZeroRatePolicy,
) -> FinCalcResult<Money> {
    let r = monthly_rate(annual_rate_percent);

    if r.is_zero() && policy == ZeroRatePolicy::Straight && term_periods > 0 {
        return Ok(principal / Decimal::from(term_periods));
    }

    let factor = growth_factor(r, term_periods)?;
    let denominator = factor - Decimal::ONE;

    if denominator.is_zero() {
        warn!(
            annual_rate_percent = %annual_rate_percent,
            term_periods,
            "EMI annuity denominator is zero"
        );
        return Err(FinCalcError::DivisionByZero {
            context: "EMI annuity denominator (1 + r)^n - 1".into(),
        });
    }

    // Scale the rate first; `principal * r * factor` overflows long before the EMI does.
    let scaled = checked_div(
        checked_mul(r, factor, "EMI growth term")?,
        denominator,
        "EMI annuity ratio",
    )?;
    let emi = checked_mul(principal, scaled, "EMI")?;
    debug!(principal = %principal, rate = %r, term_periods, emi = %emi, "computed EMI");
    Ok(emi)
}

pub(crate) fn validate_loan(input: &LoanInput) -> FinCalcResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(FinCalcError::invalid("principal", "principal must be > 0"));
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
    Ok(())
}

/// Validate loan terms, compute the EMI and derive total payment and interest.
pub fn calculate_loan(
    input: &LoanInput,
    policy: ZeroRatePolicy,
) -> FinCalcResult<ComputationOutput<LoanResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_loan(input)?;

    let periodic_payment = compute_emi(
        input.principal,
        input.annual_rate_percent,
        input.term_periods,
        policy,
    )?;
    let total_payment = checked_mul(
        periodic_payment,
        Decimal::from(input.term_periods),
        "total payment",
    )?;
    let total_interest = total_payment - input.principal;

    if input.annual_rate_percent.is_zero() {
        warnings.push("Zero interest rate: payment is principal / term".into());
    }

    let result = LoanResult {
        periodic_payment,
        total_payment,
        total_interest,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Equated monthly installment (level-payment annuity)",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "term_periods": input.term_periods,
            "zero_rate_policy": policy,
        }),
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sample_loan() -> LoanInput {
        LoanInput {
            principal: dec!(100000),
            annual_rate_percent: dec!(8.5),
            term_periods: 60,
        }
    }

    #[test]
    fn test_monthly_rate_divides_by_1200() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
    }

    #[test]
    fn test_emi_reference_loan() {
        let emi = compute_emi(dec!(100000), dec!(8.5), 60, ZeroRatePolicy::Singular).unwrap();
        // 100000 @ 8.5% over 60 months = 2051.653...
        assert!((emi - dec!(2051.6531)).abs() < dec!(0.001));
    }

    #[test]
    fn test_emi_twelve_percent_one_year() {
        let emi = compute_emi(dec!(1000), dec!(12), 12, ZeroRatePolicy::Singular).unwrap();
        assert!((emi - dec!(88.8488)).abs() < dec!(0.001));
    }

    #[test]
    fn test_zero_rate_singular_is_division_by_zero() {
        let err = compute_emi(dec!(1200), dec!(0), 12, ZeroRatePolicy::Singular).unwrap_err();
        assert!(matches!(err, FinCalcError::DivisionByZero { .. }));
    }

    #[test]
    fn test_zero_rate_straight_splits_evenly() {
        let emi = compute_emi(dec!(1200), dec!(0), 12, ZeroRatePolicy::Straight).unwrap();
        assert_eq!(emi, dec!(100));
    }

    #[test]
    fn test_zero_term_is_division_by_zero_under_both_policies() {
        for policy in [ZeroRatePolicy::Singular, ZeroRatePolicy::Straight] {
            let err = compute_emi(dec!(1200), dec!(0), 0, policy).unwrap_err();
            assert!(matches!(err, FinCalcError::DivisionByZero { .. }));
        }
    }

    #[test]
    fn test_growth_near_decimal_max_still_prices() {
        // 1.1^693 is within a factor of two of Decimal::MAX
        let emi = compute_emi(dec!(1000), dec!(120), 693, ZeroRatePolicy::Singular).unwrap();
        assert!((emi - dec!(100)).abs() < dec!(0.01));
    }

    #[test]
    fn test_unrepresentable_growth_is_financial_impossibility() {
        let err = compute_emi(dec!(1000), dec!(120), 5000, ZeroRatePolicy::Singular).unwrap_err();
        assert!(matches!(err, FinCalcError::FinancialImpossibility(_)));
    }

    #[test]
    fn test_total_payment_overflow_is_an_error() {
        let input = LoanInput {
            principal: Decimal::MAX,
            annual_rate_percent: dec!(12),
            term_periods: 12,
        };
        let err = calculate_loan(&input, ZeroRatePolicy::Singular).unwrap_err();
        assert!(matches!(err, FinCalcError::FinancialImpossibility(_)));
    }

    #[test]
    fn test_calculate_loan_derives_totals() {
        let out = calculate_loan(&sample_loan(), ZeroRatePolicy::Singular).unwrap();
        let r = &out.result;
        assert_eq!(r.total_payment, r.periodic_payment * dec!(60));
        assert_eq!(r.total_interest, r.total_payment - dec!(100000));
        assert!((r.total_interest - dec!(23099.19)).abs() < dec!(0.01));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_calculate_loan_warns_on_straight_zero_rate() {
        let input = LoanInput {
            annual_rate_percent: dec!(0),
            ..sample_loan()
        };
        let out = calculate_loan(&input, ZeroRatePolicy::Straight).unwrap();
        assert_eq!(out.result.total_interest, dec!(0));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_calculate_loan_rejects_bad_inputs() {
        let cases = [
            LoanInput { principal: dec!(0), ..sample_loan() },
            LoanInput { annual_rate_percent: dec!(-1), ..sample_loan() },
            LoanInput { term_periods: 0, ..sample_loan() },
        ];
        for input in cases {
            let err = calculate_loan(&input, ZeroRatePolicy::Straight).unwrap_err();
            assert!(matches!(err, FinCalcError::InvalidInput { .. }), "{input:?}");
        }
    }
}
