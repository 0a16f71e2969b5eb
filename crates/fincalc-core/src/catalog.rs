//! Registry of every calculator, keyed by URL slug.
//!
//! The registry is a static table built at compile time; front ends look a
//! calculator up by slug and call its runner with a JSON payload plus the
//! caller's [`Settings`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::FinCalcError;
use crate::settings::Settings;
use crate::FinCalcResult;

/// Signature shared by every catalog entry.
pub type Runner = fn(Value, &Settings) -> FinCalcResult<Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Loan,
    Tax,
    Investment,
    Currency,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CalculatorEntry {
    pub slug: &'static str,
    pub title: &'static str,
    pub category: Category,
    pub description: &'static str,
    #[serde(skip)]
    pub run: Runner,
}

static CATALOG: &[CalculatorEntry] = &[
    #[cfg(feature = "loan")]
    CalculatorEntry {
        slug: "emi",
        title: "EMI Calculator",
        category: Category::Loan,
        description: "Fixed monthly installment, total payment and total interest for a loan",
        run: runners::emi,
    },
    #[cfg(feature = "loan")]
    CalculatorEntry {
        slug: "amortization",
        title: "Loan Amortization Schedule",
        category: Category::Loan,
        description: "Month-by-month split of each installment into interest and principal",
        run: runners::amortization,
    },
    #[cfg(feature = "loan")]
    CalculatorEntry {
        slug: "loan-affordability",
        title: "Loan Affordability Calculator",
        category: Category::Loan,
        description: "Largest loan a monthly installment budget can service",
        run: runners::affordability,
    },
    #[cfg(feature = "tax")]
    CalculatorEntry {
        slug: "income-tax",
        title: "Income Tax Calculator",
        category: Category::Tax,
        description: "Tax owed under progressive marginal brackets after deductions",
        run: runners::income_tax,
    },
    #[cfg(feature = "investment")]
    CalculatorEntry {
        slug: "compound-interest",
        title: "Compound Interest Calculator",
        category: Category::Investment,
        description: "Maturity amount with annual to daily compounding",
        run: runners::compound_interest,
    },
    #[cfg(feature = "investment")]
    CalculatorEntry {
        slug: "simple-interest",
        title: "Simple Interest Calculator",
        category: Category::Investment,
        description: "Interest on principal alone over a period in years",
        run: runners::simple_interest,
    },
    #[cfg(feature = "investment")]
    CalculatorEntry {
        slug: "sip",
        title: "SIP Calculator",
        category: Category::Investment,
        description: "Future value of a fixed monthly investment",
        run: runners::sip,
    },
    #[cfg(feature = "currency")]
    CalculatorEntry {
        slug: "currency-converter",
        title: "Currency Converter",
        category: Category::Currency,
        description: "Convert an amount between currencies using supplied rates",
        run: runners::currency_converter,
    },
];

/// Every calculator compiled into this build.
pub fn catalog() -> &'static [CalculatorEntry] {
    CATALOG
}

pub fn find(slug: &str) -> Option<&'static CalculatorEntry> {
    CATALOG.iter().find(|entry| entry.slug == slug)
}

pub fn by_category(category: Category) -> impl Iterator<Item = &'static CalculatorEntry> {
    CATALOG.iter().filter(move |entry| entry.category == category)
}

/// Run the calculator registered under `slug` on a JSON payload.
pub fn run(slug: &str, input: Value, settings: &Settings) -> FinCalcResult<Value> {
    let entry = find(slug).ok_or_else(|| {
        FinCalcError::invalid("calculator", format!("unknown calculator '{slug}'"))
    })?;
    debug!(slug, "running calculator");
    (entry.run)(input, settings)
}

#[allow(dead_code)]
fn parse<T: DeserializeOwned>(input: Value) -> FinCalcResult<T> {
    Ok(serde_json::from_value(input)?)
}

#[allow(dead_code)]
fn emit<T: Serialize>(output: &T) -> FinCalcResult<Value> {
    Ok(serde_json::to_value(output)?)
}

mod runners {
    #[allow(unused_imports)]
    use super::{emit, parse};
    use crate::settings::Settings;
    use crate::FinCalcResult;
    use serde_json::Value;

    #[cfg(feature = "loan")]
    pub(super) fn emi(input: Value, settings: &Settings) -> FinCalcResult<Value> {
        use crate::loan::emi::{calculate_loan, LoanInput};
        let input: LoanInput = parse(input)?;
        emit(&calculate_loan(&input, settings.zero_rate_policy)?)
    }

    #[cfg(feature = "loan")]
    pub(super) fn amortization(input: Value, settings: &Settings) -> FinCalcResult<Value> {
        use crate::loan::schedule::{amortization_schedule, ScheduleInput};
        let input: ScheduleInput = parse(input)?;
        emit(&amortization_schedule(&input, settings.zero_rate_policy)?)
    }

    #[cfg(feature = "loan")]
    pub(super) fn affordability(input: Value, _settings: &Settings) -> FinCalcResult<Value> {
        use crate::loan::affordability::{loan_affordability, AffordabilityInput};
        let input: AffordabilityInput = parse(input)?;
        emit(&loan_affordability(&input)?)
    }

    #[cfg(feature = "tax")]
    pub(super) fn income_tax(input: Value, settings: &Settings) -> FinCalcResult<Value> {
        use crate::tax::{calculate_tax, TaxInput, TaxSchedule};
        use rust_decimal::Decimal;
        use serde::Deserialize;

        /// Tax input with an optional schedule override.
        #[derive(Deserialize)]
        struct Request {
            gross_income: Decimal,
            #[serde(default)]
            deductions: Decimal,
            #[serde(default)]
            schedule: Option<TaxSchedule>,
        }

        let request: Request = parse(input)?;
        let schedule = request.schedule.unwrap_or_default();
        let input = TaxInput {
            gross_income: request.gross_income,
            deductions: request.deductions,
        };
        emit(&calculate_tax(&input, &schedule, settings.taxable_income_floor)?)
    }

    #[cfg(feature = "investment")]
    pub(super) fn compound_interest(input: Value, _settings: &Settings) -> FinCalcResult<Value> {
        use crate::investment::interest::{compound_interest, CompoundInterestInput};
        let input: CompoundInterestInput = parse(input)?;
        emit(&compound_interest(&input)?)
    }

    #[cfg(feature = "investment")]
    pub(super) fn simple_interest(input: Value, _settings: &Settings) -> FinCalcResult<Value> {
        use crate::investment::interest::{simple_interest, SimpleInterestInput};
        let input: SimpleInterestInput = parse(input)?;
        emit(&simple_interest(&input)?)
    }

    #[cfg(feature = "investment")]
    pub(super) fn sip(input: Value, _settings: &Settings) -> FinCalcResult<Value> {
        use crate::investment::sip::{sip, SipInput};
        let input: SipInput = parse(input)?;
        emit(&sip(&input)?)
    }

    #[cfg(feature = "currency")]
    pub(super) fn currency_converter(input: Value, _settings: &Settings) -> FinCalcResult<Value> {
        use crate::currency::{convert, ConversionInput};
        let input: ConversionInput = parse(input)?;
        emit(&convert(&input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::collections::HashSet;

    fn decimal_at(value: &Value) -> Decimal {
        value.as_str().unwrap().parse().unwrap()
    }

    #[test]
    fn test_slugs_are_unique() {
        let slugs: HashSet<&str> = catalog().iter().map(|e| e.slug).collect();
        assert_eq!(slugs.len(), catalog().len());
    }

    #[test]
    fn test_unknown_slug_is_invalid_input() {
        let err = run("mortgage-refinance", json!({}), &Settings::default()).unwrap_err();
        assert!(matches!(err, FinCalcError::InvalidInput { .. }));
    }

    #[test]
    fn test_entries_serialize_without_runner() {
        let value = serde_json::to_value(catalog()).unwrap();
        for entry in value.as_array().unwrap() {
            assert!(entry.get("run").is_none());
            assert!(entry["slug"].is_string());
        }
    }

    #[cfg(feature = "loan")]
    #[test]
    fn test_emi_runs_through_registry() {
        let out = run(
            "emi",
            json!({"principal": 100000, "annual_rate_percent": 8.5, "term_periods": 60}),
            &Settings::default(),
        )
        .unwrap();
        let payment = decimal_at(&out["result"]["periodic_payment"]);
        assert!((payment - dec!(2051.65)).abs() < dec!(0.01));
    }

    #[cfg(feature = "loan")]
    #[test]
    fn test_settings_policy_reaches_engine() {
        let input = json!({"principal": 1200, "annual_rate_percent": 0, "term_periods": 12});
        assert!(run("emi", input.clone(), &Settings::default()).is_err());

        let settings = Settings {
            zero_rate_policy: crate::policy::ZeroRatePolicy::Straight,
            ..Settings::default()
        };
        let out = run("emi", input, &settings).unwrap();
        assert_eq!(decimal_at(&out["result"]["periodic_payment"]), dec!(100));
    }

    #[cfg(feature = "tax")]
    #[test]
    fn test_income_tax_accepts_schedule_override() {
        let input = json!({
            "gross_income": 20000,
            "schedule": {
                "name": "flat",
                "brackets": [{"upper_bound": null, "marginal_rate": "0.1"}]
            }
        });
        let out = run("income-tax", input, &Settings::default()).unwrap();
        assert_eq!(decimal_at(&out["result"]["tax_amount"]), dec!(2000));
        assert_eq!(out["assumptions"]["schedule"], "flat");
    }

    #[cfg(feature = "tax")]
    #[test]
    fn test_by_category_filters() {
        assert!(by_category(Category::Tax).all(|e| e.category == Category::Tax));
        assert!(by_category(Category::Tax).any(|e| e.slug == "income-tax"));
    }
}
