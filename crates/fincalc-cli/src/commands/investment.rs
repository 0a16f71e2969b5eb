use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::investment::interest::{
    self, CompoundInterestInput, CompoundingFrequency, SimpleInterestInput,
};
use fincalc_core::investment::sip::{self, SipInput};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
    Daily,
}

impl From<FrequencyArg> for CompoundingFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Annually => CompoundingFrequency::Annually,
            FrequencyArg::SemiAnnually => CompoundingFrequency::SemiAnnually,
            FrequencyArg::Quarterly => CompoundingFrequency::Quarterly,
            FrequencyArg::Monthly => CompoundingFrequency::Monthly,
            FrequencyArg::Daily => CompoundingFrequency::Daily,
        }
    }
}

/// Arguments for compound interest
#[derive(Args)]
pub struct CompoundArgs {
    /// Amount invested
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Duration in whole years
    #[arg(long)]
    pub years: Option<u32>,

    /// Compounding frequency
    #[arg(long, value_enum, default_value = "annually")]
    pub frequency: FrequencyArg,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for simple interest
#[derive(Args)]
pub struct SimpleInterestArgs {
    /// Amount invested or borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Duration in years (fractions allowed)
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a systematic investment plan
#[derive(Args)]
pub struct SipArgs {
    /// Monthly contribution
    #[arg(long)]
    pub monthly: Option<Decimal>,

    /// Expected annual return in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Duration in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Contribute at the end of each month instead of the start
    #[arg(long)]
    pub end_of_month: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compound(args: CompoundArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ci_input: CompoundInterestInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => CompoundInterestInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            frequency: args.frequency.into(),
        },
    };

    let result = interest::compound_interest(&ci_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_simple_interest(args: SimpleInterestArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let si_input: SimpleInterestInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => SimpleInterestInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
        },
    };

    let result = interest::simple_interest(&si_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_sip(args: SipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sip_input: SipInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => SipInput {
            monthly_investment: args.monthly.ok_or("--monthly is required (or provide --input)")?,
            expected_return_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            invest_at_start: !args.end_of_month,
        },
    };

    let result = sip::sip(&sip_input)?;
    Ok(serde_json::to_value(result)?)
}
