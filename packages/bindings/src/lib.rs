use napi::Result as NapiResult;
use napi_derive::napi;

use fincalc_core::settings::Settings;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Settings arrive as a JSON string; an empty string means defaults.
fn parse_settings(settings_json: Option<String>) -> NapiResult<Settings> {
    match settings_json.as_deref().map(str::trim) {
        None | Some("") => Ok(Settings::default()),
        Some(json) => Settings::from_json_str(json)
            .map(|loaded| loaded.settings)
            .map_err(to_napi_error),
    }
}

// ---------------------------------------------------------------------------
// Loan
// ---------------------------------------------------------------------------

/// Bare installment as a decimal string, for callers that only need the number.
#[napi]
pub fn compute_emi(
    principal: String,
    annual_rate_percent: String,
    term_periods: u32,
    settings_json: Option<String>,
) -> NapiResult<String> {
    let settings = parse_settings(settings_json)?;
    let principal: rust_decimal::Decimal = principal.parse().map_err(to_napi_error)?;
    let rate: rust_decimal::Decimal = annual_rate_percent.parse().map_err(to_napi_error)?;
    let emi = fincalc_core::loan::compute_emi(
        principal,
        rate,
        term_periods,
        settings.zero_rate_policy,
    )
    .map_err(to_napi_error)?;
    Ok(emi.to_string())
}

#[napi]
pub fn calculate_loan(input_json: String, settings_json: Option<String>) -> NapiResult<String> {
    let settings = parse_settings(settings_json)?;
    let input: fincalc_core::loan::LoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::loan::calculate_loan(&input, settings.zero_rate_policy)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(
    input_json: String,
    settings_json: Option<String>,
) -> NapiResult<String> {
    let settings = parse_settings(settings_json)?;
    let input: fincalc_core::loan::schedule::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fincalc_core::loan::schedule::amortization_schedule(&input, settings.zero_rate_policy)
            .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn loan_affordability(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::loan::affordability::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::loan::affordability::loan_affordability(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Tax
// ---------------------------------------------------------------------------

/// `schedule_json` overrides the built-in brackets when given.
#[napi]
pub fn calculate_tax(
    input_json: String,
    schedule_json: Option<String>,
    settings_json: Option<String>,
) -> NapiResult<String> {
    let settings = parse_settings(settings_json)?;
    let input: fincalc_core::tax::TaxInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let schedule = match schedule_json {
        Some(json) => fincalc_core::tax::TaxSchedule::from_json_str(&json).map_err(to_napi_error)?,
        None => fincalc_core::tax::TaxSchedule::default(),
    };
    let output = fincalc_core::tax::calculate_tax(&input, &schedule, settings.taxable_income_floor)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn default_tax_schedule() -> NapiResult<String> {
    serde_json::to_string(&fincalc_core::tax::TaxSchedule::default()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Investment
// ---------------------------------------------------------------------------

#[napi]
pub fn compound_interest(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::investment::interest::CompoundInterestInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fincalc_core::investment::interest::compound_interest(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simple_interest(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::investment::interest::SimpleInterestInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fincalc_core::investment::interest::simple_interest(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sip(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::investment::sip::SipInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::investment::sip::sip(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

#[napi]
pub fn convert_currency(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::currency::ConversionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::currency::convert(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn format_amount(amount: String, currency: String) -> NapiResult<String> {
    let amount: rust_decimal::Decimal = amount.parse().map_err(to_napi_error)?;
    let currency: fincalc_core::Currency = currency.into();
    Ok(fincalc_core::currency::format_amount(amount, &currency))
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[napi]
pub fn list_calculators() -> NapiResult<String> {
    serde_json::to_string(fincalc_core::catalog::catalog()).map_err(to_napi_error)
}

#[napi]
pub fn run_calculator(
    slug: String,
    input_json: String,
    settings_json: Option<String>,
) -> NapiResult<String> {
    let settings = parse_settings(settings_json)?;
    let input: serde_json::Value = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fincalc_core::catalog::run(&slug, input, &settings).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
