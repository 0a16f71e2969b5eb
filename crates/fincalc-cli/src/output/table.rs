use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use fincalc_core::currency::format_amount;
use fincalc_core::settings::Settings;

use super::heading;

/// Field-name endings that hold money in the display currency.
const MONEY_SUFFIXES: [&str; 11] = [
    "payment", "interest", "amount", "income", "principal", "balance", "price", "paid",
    "value", "returns", "tax",
];

/// Fields that carry money in some other currency and are left as-is.
const FOREIGN_MONEY_KEYS: [&str; 1] = ["converted_amount"];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value, settings: &Settings) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map, settings);
            } else if let Some(Value::Array(results)) = map.get("results") {
                print_array_table(results, settings);
            } else {
                print_flat_object(map, settings);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr, settings);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>, settings: &Settings) {
    if let Value::Object(res_map) = result {
        // Scalars first, then every list of records as its own table.
        print_flat_object(res_map, settings);

        for (key, val) in res_map {
            if let Value::Array(items) = val {
                if items.iter().all(Value::is_object) && !items.is_empty() {
                    println!("\n{}", heading(key, settings.theme));
                    print_array_table(items, settings);
                }
            }
        }
    } else {
        print_flat_object(envelope, settings);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", heading("Warnings:", settings.theme));
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\n{} {}", heading("Methodology:", settings.theme), meth);
    }
}

fn print_flat_object(map: &Map<String, Value>, settings: &Settings) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if is_record_list(val) {
            continue;
        }
        builder.push_record([key.clone(), format_value(key, val, settings)]);
    }
    let table = Table::from(builder);
    println!("{}", table);
}

fn print_array_table(arr: &[Value], settings: &Settings) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(|v| format_value(h, v, settings))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        let table = Table::from(builder);
        println!("{}", table);
    } else {
        for item in arr {
            println!("{}", format_value("", item, settings));
        }
    }
}

fn is_record_list(value: &Value) -> bool {
    matches!(value, Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object))
}

fn is_money_key(key: &str) -> bool {
    !FOREIGN_MONEY_KEYS.contains(&key) && MONEY_SUFFIXES.iter().any(|suffix| key.ends_with(suffix))
}

fn format_value(key: &str, value: &Value, settings: &Settings) -> String {
    match value {
        Value::String(s) => {
            if is_money_key(key) {
                if let Ok(amount) = s.parse::<Decimal>() {
                    return format_amount(amount, &settings.currency);
                }
            }
            s.clone()
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(|v| format_value(key, v, settings)).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fincalc_core::Currency;
    use serde_json::json;

    #[test]
    fn test_money_fields_use_display_currency() {
        let settings = Settings {
            currency: Currency::INR,
            ..Settings::default()
        };
        assert_eq!(
            format_value("periodic_payment", &json!("123456.789"), &settings),
            "₹1,23,456.79"
        );
    }

    #[test]
    fn test_rates_and_foreign_amounts_stay_raw() {
        let settings = Settings::default();
        assert_eq!(format_value("marginal_rate", &json!("0.22"), &settings), "0.22");
        assert_eq!(format_value("converted_amount", &json!("8300"), &settings), "8300");
        assert_eq!(format_value("period", &json!(3), &settings), "3");
    }

    #[test]
    fn test_record_lists_are_detected() {
        assert!(is_record_list(&json!([{"a": 1}])));
        assert!(!is_record_list(&json!([])));
        assert!(!is_record_list(&json!([1, 2])));
    }
}
