use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::FinCalcError;
use crate::time_value::{checked_div, checked_mul};
use crate::types::{round_cents, with_metadata, ComputationOutput, Currency, Money};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Convert between two currencies using caller-supplied quotes.
///
/// `rates` maps a currency code to units of that currency per one unit of
/// `base`. The base itself may be omitted from the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionInput {
    pub amount: Money,
    pub from: Currency,
    pub to: Currency,
    #[serde(default)]
    pub base: Currency,
    pub rates: BTreeMap<String, Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub converted_amount: Money,
    /// Units of `to` per unit of `from`.
    pub rate: Decimal,
    pub inverse_rate: Decimal,
    pub formatted: String,
}

fn quote(input: &ConversionInput, currency: &Currency, field: &str) -> FinCalcResult<Decimal> {
    if currency == &input.base {
        return Ok(Decimal::ONE);
    }
    let rate = input
        .rates
        .get(currency.code())
        .copied()
        .ok_or_else(|| FinCalcError::invalid(field, format!("no rate quoted for {currency}")))?;
    if rate <= Decimal::ZERO {
        return Err(FinCalcError::invalid(
            format!("rates.{currency}"),
            "rates must be > 0",
        ));
    }
    Ok(rate)
}

pub fn convert(input: &ConversionInput) -> FinCalcResult<ComputationOutput<ConversionOutput>> {
    let start = Instant::now();

    if input.amount < Decimal::ZERO {
        return Err(FinCalcError::invalid("amount", "amount must be >= 0"));
    }

    let from_rate = quote(input, &input.from, "from")?;
    let to_rate = quote(input, &input.to, "to")?;

    let rate = checked_div(to_rate, from_rate, "cross rate")?;
    let converted_amount = checked_mul(
        checked_div(input.amount, from_rate, "amount in base currency")?,
        to_rate,
        "converted amount",
    )?;

    let output = ConversionOutput {
        converted_amount,
        rate,
        inverse_rate: checked_div(from_rate, to_rate, "inverse rate")?,
        formatted: format_amount(converted_amount, &input.to),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cross rate through a common base currency",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// Render an amount for display: symbol, digit grouping, two decimals.
///
/// INR groups in lakhs and crores (12,34,567.00); everything else groups by
/// thousands.
pub fn format_amount(amount: Money, currency: &Currency) -> String {
    let rounded = round_cents(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let grouped = match currency {
        Currency::INR => group_indian(whole),
        _ => group_thousands(whole),
    };

    format!(
        "{}{}{}.{}",
        if negative { "-" } else { "" },
        currency.symbol(),
        grouped,
        cents
    )
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut out = String::new();
    for (i, ch) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push(',');
    out.push_str(last_three);
    out
}
