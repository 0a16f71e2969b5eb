use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;

use fincalc_core::currency::{self, ConversionInput};
use fincalc_core::Currency;

use crate::input;

/// Arguments for currency conversion
#[derive(Args)]
pub struct ConvertArgs {
    /// Amount to convert
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Source currency code
    #[arg(long)]
    pub from: Option<String>,

    /// Target currency code
    #[arg(long)]
    pub to: Option<String>,

    /// Currency the rates are quoted against
    #[arg(long, default_value = "USD")]
    pub base: String,

    /// Rates per unit of base, comma-separated (e.g. "EUR=0.92,INR=83.1")
    #[arg(long, value_delimiter = ',')]
    pub rates: Vec<String>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

fn parse_rates(pairs: &[String]) -> Result<BTreeMap<String, Decimal>, Box<dyn std::error::Error>> {
    let mut rates = BTreeMap::new();
    for pair in pairs {
        let (code, rate) = pair
            .split_once('=')
            .ok_or_else(|| format!("rate '{pair}' must look like CODE=RATE"))?;
        let rate: Decimal = rate
            .trim()
            .parse()
            .map_err(|e| format!("rate '{pair}': {e}"))?;
        rates.insert(code.trim().to_ascii_uppercase(), rate);
    }
    Ok(rates)
}

pub fn run_convert(args: ConvertArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let conv_input: ConversionInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => ConversionInput {
            amount: args.amount.ok_or("--amount is required (or provide --input)")?,
            from: Currency::from(args.from.ok_or("--from is required (or provide --input)")?),
            to: Currency::from(args.to.ok_or("--to is required (or provide --input)")?),
            base: Currency::from(args.base),
            rates: parse_rates(&args.rates)?,
        },
    };

    let result = currency::convert(&conv_input)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parses_rate_pairs() {
        let rates = parse_rates(&["eur=0.92".to_string(), " INR = 83.1".to_string()]).unwrap();
        assert_eq!(rates["EUR"], dec!(0.92));
        assert_eq!(rates["INR"], dec!(83.1));
    }

    #[test]
    fn test_rejects_malformed_pair() {
        assert!(parse_rates(&["EUR0.92".to_string()]).is_err());
        assert!(parse_rates(&["EUR=abc".to_string()]).is_err());
    }
}
