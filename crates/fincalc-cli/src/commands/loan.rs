use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::loan::affordability::{self, AffordabilityInput};
use fincalc_core::loan::emi::{self, LoanInput};
use fincalc_core::loan::schedule::{self, ScheduleInput};
use fincalc_core::settings::Settings;
use fincalc_core::ZeroRatePolicy;

use super::ZeroRateArg;
use crate::input;

/// Arguments for the EMI calculation
#[derive(Args)]
pub struct EmiArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 8.5 for 8.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub months: Option<u32>,

    /// Zero-rate handling (overrides the settings file)
    #[arg(long, value_enum)]
    pub zero_rate: Option<ZeroRateArg>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for an amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub months: Option<u32>,

    /// Due date of the first installment (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Round installments and interest to cents
    #[arg(long)]
    pub round: bool,

    /// Show the per-year summary instead of every month
    #[arg(long)]
    pub yearly: bool,

    /// Zero-rate handling (overrides the settings file)
    #[arg(long, value_enum)]
    pub zero_rate: Option<ZeroRateArg>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for loan affordability
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Monthly installment budget
    #[arg(long)]
    pub budget: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub months: Option<u32>,

    /// Cash available as a down payment
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

fn zero_rate_policy(arg: Option<ZeroRateArg>, settings: &Settings) -> ZeroRatePolicy {
    arg.map(ZeroRatePolicy::from)
        .unwrap_or(settings.zero_rate_policy)
}

pub fn run_emi(args: EmiArgs, settings: &Settings) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => LoanInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_periods: args.months.ok_or("--months is required (or provide --input)")?,
        },
    };

    let policy = zero_rate_policy(args.zero_rate, settings);
    let result = emi::calculate_loan(&loan_input, policy)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(
    args: ScheduleArgs,
    settings: &Settings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: ScheduleInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => ScheduleInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_periods: args.months.ok_or("--months is required (or provide --input)")?,
            start_date: args.start_date,
            round_payments: args.round,
        },
    };

    let policy = zero_rate_policy(args.zero_rate, settings);
    let output = schedule::amortization_schedule(&schedule_input, policy)?;

    // Only one table is rendered, so drop the one not asked for.
    let mut value = serde_json::to_value(output)?;
    if let Some(result) = value.get_mut("result").and_then(Value::as_object_mut) {
        result.remove(if args.yearly { "rows" } else { "yearly" });
    }
    Ok(value)
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let afford_input: AffordabilityInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => AffordabilityInput {
            monthly_budget: args.budget.ok_or("--budget is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_periods: args.months.ok_or("--months is required (or provide --input)")?,
            down_payment: args.down_payment,
        },
    };

    let result = affordability::loan_affordability(&afford_input)?;
    Ok(serde_json::to_value(result)?)
}
