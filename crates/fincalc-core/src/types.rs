use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Rates expressed as percentages (8.5 = 8.5%), the way calculator forms take them.
pub type Percent = Decimal;

/// Currency code
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Currency {
    GBP,
    #[default]
    USD,
    EUR,
    INR,
    JPY,
    CAD,
    AUD,
    SGD,
    Other(String),
}

impl Currency {
    pub fn code(&self) -> &str {
        match self {
            Currency::GBP => "GBP",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::INR => "INR",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::SGD => "SGD",
            Currency::Other(code) => code.as_str(),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Currency::GBP => "£",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::INR => "₹",
            Currency::JPY => "¥",
            Currency::CAD => "C$",
            Currency::AUD => "A$",
            Currency::SGD => "S$",
            Currency::Other(code) => code.as_str(),
        }
    }
}

impl FromStr for Currency {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Ok(match code.as_str() {
            "GBP" => Currency::GBP,
            "USD" => Currency::USD,
            "EUR" => Currency::EUR,
            "INR" => Currency::INR,
            "JPY" => Currency::JPY,
            "CAD" => Currency::CAD,
            "AUD" => Currency::AUD,
            "SGD" => Currency::SGD,
            _ => Currency::Other(code),
        })
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(currency) => currency,
            Err(never) => match never {},
        }
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.code().to_string()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Round a monetary amount to cents, half away from zero.
pub fn round_cents(value: Money) -> Money {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a percentage (8.5) into a decimal rate (0.085).
pub fn percent_to_rate(percent: Percent) -> Rate {
    percent / Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_round_trips_through_code() {
        let c: Currency = serde_json::from_str("\"inr\"").unwrap();
        assert_eq!(c, Currency::INR);
        assert_eq!(serde_json::to_string(&Currency::Other("CHF".into())).unwrap(), "\"CHF\"");
    }

    #[test]
    fn test_round_cents_is_half_up() {
        assert_eq!(round_cents(dec!(2051.655)), dec!(2051.66));
        assert_eq!(round_cents(dec!(2051.654)), dec!(2051.65));
        assert_eq!(round_cents(dec!(-10.005)), dec!(-10.01));
    }

    #[test]
    fn test_percent_to_rate_divides_by_hundred() {
        assert_eq!(percent_to_rate(dec!(8.5)), dec!(0.085));
    }

    #[test]
    fn test_with_metadata_records_assumptions() {
        let out = with_metadata("m", &serde_json::json!({"a": 1}), vec![], 3, dec!(1));
        assert_eq!(out.assumptions["a"], 1);
        assert_eq!(out.metadata.computation_time_us, 3);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }
}
