//! Spreadsheet-style time value of money primitives.
//!
//! Sign convention follows PV/FV/PMT in spreadsheets: money paid out is
//! negative, money received is positive. Periods are whole periods, so
//! `(1 + r)^n` is computed with integer powers rather than `powd`.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::FinCalcError;
use crate::types::{Money, Rate};
use crate::FinCalcResult;

/// `(1 + rate)^nper`, checked against overflow.
pub fn growth_factor(rate: Rate, nper: u32) -> FinCalcResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(nper))
        .ok_or_else(|| {
            FinCalcError::FinancialImpossibility(format!(
                "(1 + {rate})^{nper} overflows the decimal range"
            ))
        })
}

/// `a * b`; overflow means the inputs describe sums no decimal can hold.
pub(crate) fn checked_mul(a: Decimal, b: Decimal, context: &str) -> FinCalcResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| FinCalcError::FinancialImpossibility(format!("{context} overflows")))
}

/// `a / b`. Callers rule out a zero divisor first.
pub(crate) fn checked_div(a: Decimal, b: Decimal, context: &str) -> FinCalcResult<Decimal> {
    a.checked_div(b)
        .ok_or_else(|| FinCalcError::FinancialImpossibility(format!("{context} overflows")))
}

pub(crate) fn checked_add(a: Decimal, b: Decimal, context: &str) -> FinCalcResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| FinCalcError::FinancialImpossibility(format!("{context} overflows")))
}

/// Present Value
pub fn pv(rate: Rate, nper: u32, pmt: Money, fv: Money) -> FinCalcResult<Money> {
    if rate.is_zero() {
        let paid = checked_mul(pmt, Decimal::from(nper), "PV payment total")?;
        return Ok(-checked_add(paid, fv, "PV")?);
    }

    let factor = growth_factor(rate, nper)?;

    if factor.is_zero() {
        return Err(FinCalcError::DivisionByZero {
            context: "PV factor".into(),
        });
    }

    let discount = checked_div(Decimal::ONE, factor, "PV discount factor")?;
    let annuity_factor = checked_div(Decimal::ONE - discount, rate, "PV annuity factor")?;
    let annuity = checked_mul(pmt, annuity_factor, "PV of payments")?;
    let lump = checked_div(fv, factor, "PV of future value")?;
    Ok(-checked_add(annuity, lump, "PV")?)
}

/// Future Value
pub fn fv(rate: Rate, nper: u32, pmt: Money, present_value: Money) -> FinCalcResult<Money> {
    if rate.is_zero() {
        let paid = checked_mul(pmt, Decimal::from(nper), "FV payment total")?;
        return Ok(-checked_add(present_value, paid, "FV")?);
    }

    let factor = growth_factor(rate, nper)?;
    let annuity_factor = checked_div(factor - Decimal::ONE, rate, "FV annuity factor")?;

    let grown = checked_mul(present_value, factor, "FV of present value")?;
    let annuity = checked_mul(pmt, annuity_factor, "FV of payments")?;
    Ok(-checked_add(grown, annuity, "FV")?)
}

/// Payment (PMT)
pub fn pmt(rate: Rate, nper: u32, present_value: Money, future_value: Money) -> FinCalcResult<Money> {
    if nper == 0 {
        return Err(FinCalcError::invalid("nper", "Number of periods must be > 0"));
    }

    if rate.is_zero() {
        let total = checked_add(present_value, future_value, "PMT")?;
        return Ok(-total / Decimal::from(nper));
    }

    let factor = growth_factor(rate, nper)?;
    let annuity_factor = checked_div(factor - Decimal::ONE, rate, "PMT annuity factor")?;

    if annuity_factor.is_zero() {
        return Err(FinCalcError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    let grown = checked_mul(present_value, factor, "PMT present value")?;
    let numerator = checked_add(grown, future_value, "PMT")?;
    Ok(-checked_div(numerator, annuity_factor, "PMT")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pv_of_annuity() {
        let result = pv(dec!(0.08), 10, dec!(-100), dec!(0)).unwrap();
        // 100 * (1 - 1/1.08^10) / 0.08 = ~671.01
        assert!((result - dec!(671.01)).abs() < dec!(0.01));
    }

    #[test]
    fn test_fv_of_lump_sum() {
        let result = fv(dec!(0.05), 10, dec!(0), dec!(-10000)).unwrap();
        // 10000 * 1.05^10 = 16288.95
        assert!((result - dec!(16288.95)).abs() < dec!(0.01));
    }

    #[test]
    fn test_pmt_matches_monthly_loan() {
        let r = dec!(0.01);
        let result = pmt(r, 12, dec!(1000), dec!(0)).unwrap();
        // Outflow of ~88.85 per month
        assert!((result + dec!(88.85)).abs() < dec!(0.01));
    }

    #[test]
    fn test_zero_rate_branches() {
        assert_eq!(pv(dec!(0), 4, dec!(-25), dec!(0)).unwrap(), dec!(100));
        assert_eq!(fv(dec!(0), 4, dec!(-25), dec!(0)).unwrap(), dec!(100));
        assert_eq!(pmt(dec!(0), 4, dec!(100), dec!(0)).unwrap(), dec!(-25));
    }

    #[test]
    fn test_fv_reports_overflow_instead_of_panicking() {
        // 1.01^6360 fits, but dividing it by 0.01 does not
        let err = fv(dec!(0.01), 6360, dec!(-5000), dec!(0)).unwrap_err();
        assert!(matches!(err, FinCalcError::FinancialImpossibility(_)));
    }

    #[test]
    fn test_growth_factor_overflow_is_an_error() {
        assert!(matches!(
            growth_factor(dec!(0.1), 5000),
            Err(FinCalcError::FinancialImpossibility(_))
        ));
    }

    #[test]
    fn test_pmt_rejects_zero_periods() {
        assert!(matches!(
            pmt(dec!(0.01), 0, dec!(100), dec!(0)),
            Err(FinCalcError::InvalidInput { .. })
        ));
    }
}
