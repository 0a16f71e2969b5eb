use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::settings::Settings;
use fincalc_core::tax::{self, TaxInput, TaxSchedule};
use fincalc_core::TaxableIncomeFloor;

use super::TaxableFloorArg;
use crate::input;
use crate::input::file::{has_yaml_extension, read_text};

/// Arguments for the income tax calculation
#[derive(Args)]
pub struct TaxArgs {
    /// Gross annual income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Total deductions
    #[arg(long, default_value = "0")]
    pub deductions: Decimal,

    /// Bracket schedule file (JSON or YAML); defaults to the built-in US 2024 schedule
    #[arg(long)]
    pub schedule: Option<String>,

    /// Negative taxable income handling (overrides the settings file)
    #[arg(long, value_enum)]
    pub taxable_floor: Option<TaxableFloorArg>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

fn load_schedule(path: Option<&str>) -> Result<TaxSchedule, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(TaxSchedule::us_2024());
    };

    let (canonical, contents) = read_text(path)?;
    let schedule = if has_yaml_extension(&canonical) {
        TaxSchedule::from_yaml_str(&contents)
    } else {
        TaxSchedule::from_json_str(&contents)
    }
    .map_err(|e| format!("Invalid tax schedule '{}': {}", canonical.display(), e))?;

    Ok(schedule)
}

pub fn run_tax(args: TaxArgs, settings: &Settings) -> Result<Value, Box<dyn std::error::Error>> {
    let tax_input: TaxInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => TaxInput {
            gross_income: args.income.ok_or("--income is required (or provide --input)")?,
            deductions: args.deductions,
        },
    };

    let schedule = load_schedule(args.schedule.as_deref())?;
    let floor = args
        .taxable_floor
        .map(TaxableIncomeFloor::from)
        .unwrap_or(settings.taxable_income_floor);

    let result = tax::calculate_tax(&tax_input, &schedule, floor)?;
    Ok(serde_json::to_value(result)?)
}
