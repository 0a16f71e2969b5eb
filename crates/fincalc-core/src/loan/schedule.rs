use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::emi::{compute_emi, monthly_rate, validate_loan, LoanInput};
use crate::error::FinCalcError;
use crate::policy::ZeroRatePolicy;
use crate::time_value::{checked_add, checked_mul};
use crate::types::{round_cents, with_metadata, ComputationOutput, Money, Percent};
use crate::FinCalcResult;

/// A century of monthly installments; longer tables are rejected before
/// any rows are allocated.
pub const MAX_SCHEDULE_PERIODS: u32 = 1200;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a full amortization table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub term_periods: u32,
    /// Due date of the first installment; later rows fall one month apart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Round the installment and each interest charge to cents.
    #[serde(default)]
    pub round_payments: bool,
}

impl ScheduleInput {
    pub fn loan(&self) -> LoanInput {
        LoanInput {
            principal: self.principal,
            annual_rate_percent: self.annual_rate_percent,
            term_periods: self.term_periods,
        }
    }
}

/// One installment of the amortization table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

/// Per-loan-year totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub periodic_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub rows: Vec<AmortizationRow>,
    pub yearly: Vec<YearSummary>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Build the period-by-period amortization table for a level-payment loan.
///
/// The last installment pays off whatever balance remains, so the closing
/// balance always ends at exactly zero and principal repaid sums to the
/// original principal.
pub fn amortization_schedule(
    input: &ScheduleInput,
    policy: ZeroRatePolicy,
) -> FinCalcResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let loan = input.loan();
    validate_loan(&loan)?;
    if loan.term_periods > MAX_SCHEDULE_PERIODS {
        return Err(FinCalcError::invalid(
            "term_periods",
            format!("schedules are limited to {MAX_SCHEDULE_PERIODS} periods"),
        ));
    }

    let r = monthly_rate(loan.annual_rate_percent);
    let mut payment = compute_emi(
        loan.principal,
        loan.annual_rate_percent,
        loan.term_periods,
        policy,
    )?;
    if input.round_payments {
        payment = round_cents(payment);
    }

    let mut rows = Vec::with_capacity(loan.term_periods as usize);
    let mut yearly: Vec<YearSummary> = Vec::new();
    let mut balance = loan.principal;
    let mut total_payment = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;

    for period in 1..=loan.term_periods {
        let opening = balance;
        let mut interest = checked_mul(opening, r, "period interest")?;
        if input.round_payments {
            interest = round_cents(interest);
        }

        let (installment, principal_part) = if period == loan.term_periods {
            (checked_add(opening, interest, "final installment")?, opening)
        } else {
            (payment, payment - interest)
        };
        balance = opening - principal_part;
        total_payment = checked_add(total_payment, installment, "total payment")?;
        total_interest = checked_add(total_interest, interest, "total interest")?;

        let due_date = input
            .start_date
            .and_then(|d| d.checked_add_months(Months::new(period - 1)));

        rows.push(AmortizationRow {
            period,
            due_date,
            opening_balance: opening,
            payment: installment,
            interest,
            principal: principal_part,
            closing_balance: balance,
        });

        let year = (period - 1) / 12 + 1;
        match yearly.last_mut() {
            Some(summary) if summary.year == year => {
                summary.principal_paid += principal_part;
                summary.interest_paid += interest;
                summary.closing_balance = balance;
            }
            _ => yearly.push(YearSummary {
                year,
                principal_paid: principal_part,
                interest_paid: interest,
                closing_balance: balance,
            }),
        }
    }

    if let Some(last) = rows.last() {
        if (last.payment - payment).abs() >= Decimal::ONE {
            warnings.push(format!(
                "Final installment {} differs from the level payment {} by 1 or more",
                last.payment, payment
            ));
        }
    }

    debug!(
        periods = rows.len(),
        total_interest = %total_interest,
        "built amortization schedule"
    );

    let output = ScheduleOutput {
        periodic_payment: payment,
        total_payment,
        total_interest,
        rows,
        yearly,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization, interest on opening balance",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn one_year_loan() -> ScheduleInput {
        ScheduleInput {
            principal: dec!(1000),
            annual_rate_percent: dec!(12),
            term_periods: 12,
            start_date: None,
            round_payments: false,
        }
    }

    #[test]
    fn test_schedule_pays_off_exactly() {
        let out = amortization_schedule(&one_year_loan(), ZeroRatePolicy::Singular).unwrap();
        let rows = &out.result.rows;
        assert_eq!(rows.len(), 12);
        assert_eq!(rows.last().unwrap().closing_balance, dec!(0));
        let repaid: Decimal = rows.iter().map(|r| r.principal).sum();
        assert_eq!(repaid, dec!(1000));
    }

    #[test]
    fn test_first_row_interest_is_on_full_principal() {
        let out = amortization_schedule(&one_year_loan(), ZeroRatePolicy::Singular).unwrap();
        let first = &out.result.rows[0];
        assert_eq!(first.opening_balance, dec!(1000));
        assert_eq!(first.interest, dec!(10));
        assert_eq!(first.principal, first.payment - dec!(10));
    }

    #[test]
    fn test_rounded_schedule_uses_cents() {
        let input = ScheduleInput {
            round_payments: true,
            ..one_year_loan()
        };
        let out = amortization_schedule(&input, ZeroRatePolicy::Singular).unwrap();
        assert_eq!(out.result.periodic_payment, dec!(88.85));
        for row in &out.result.rows {
            assert_eq!(row.interest, round_cents(row.interest));
        }
        assert_eq!(out.result.rows.last().unwrap().closing_balance, dec!(0));
    }

    #[test]
    fn test_due_dates_step_monthly() {
        let input = ScheduleInput {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..one_year_loan()
        };
        let out = amortization_schedule(&input, ZeroRatePolicy::Singular).unwrap();
        let rows = &out.result.rows;
        assert_eq!(rows[0].due_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        // Month-end clamps to the last day of February
        assert_eq!(rows[1].due_date, NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(rows[11].due_date, NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn test_yearly_summary_rolls_up_months() {
        let input = ScheduleInput {
            term_periods: 30,
            ..one_year_loan()
        };
        let out = amortization_schedule(&input, ZeroRatePolicy::Singular).unwrap();
        let yearly = &out.result.yearly;
        assert_eq!(yearly.len(), 3);
        assert_eq!(yearly[2].closing_balance, dec!(0));
        let interest: Decimal = yearly.iter().map(|y| y.interest_paid).sum();
        assert_eq!(interest, out.result.total_interest);
    }

    #[test]
    fn test_overlong_schedule_is_rejected_before_allocating() {
        let input = ScheduleInput {
            annual_rate_percent: dec!(0.0001),
            term_periods: u32::MAX,
            ..one_year_loan()
        };
        let err = amortization_schedule(&input, ZeroRatePolicy::Straight).unwrap_err();
        assert!(matches!(err, FinCalcError::InvalidInput { ref field, .. } if field == "term_periods"));
    }

    #[test]
    fn test_longest_schedule_still_pays_off() {
        let input = ScheduleInput {
            term_periods: MAX_SCHEDULE_PERIODS,
            ..one_year_loan()
        };
        let out = amortization_schedule(&input, ZeroRatePolicy::Singular).unwrap();
        assert_eq!(out.result.rows.len(), MAX_SCHEDULE_PERIODS as usize);
        assert_eq!(out.result.yearly.len(), 100);
        assert_eq!(out.result.rows.last().unwrap().closing_balance, dec!(0));
    }

    #[test]
    fn test_zero_rate_follows_policy() {
        let input = ScheduleInput {
            annual_rate_percent: dec!(0),
            ..one_year_loan()
        };
        assert!(amortization_schedule(&input, ZeroRatePolicy::Singular).is_err());
        let out = amortization_schedule(&input, ZeroRatePolicy::Straight).unwrap();
        assert_eq!(out.result.total_interest, dec!(0));
        assert_eq!(out.result.total_payment, dec!(1000));
    }
}
