//! User preferences passed explicitly to every calculator call.
//!
//! Settings are read once at startup. Older front ends stored a handful of
//! flags under camelCase keys (`darkMode`, `adPopupShown`, ...); those are
//! rewritten to the current keys by [`Settings::from_value`] and never
//! consulted again.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::error::FinCalcError;
use crate::policy::{TaxableIncomeFloor, ZeroRatePolicy};
use crate::types::Currency;
use crate::FinCalcResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    /// Display currency for formatted amounts.
    pub currency: Currency,
    pub zero_rate_policy: ZeroRatePolicy,
    pub taxable_income_floor: TaxableIncomeFloor,
    pub ad_popup_dismissed: bool,
}

/// Settings plus the legacy keys that were rewritten while loading them.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub migrated_keys: Vec<String>,
}

impl Settings {
    /// Migrate legacy keys, then deserialize.
    pub fn from_value(value: Value) -> FinCalcResult<LoadedSettings> {
        let mut map = match value {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(FinCalcError::invalid(
                    "settings",
                    format!("expected an object, got {other}"),
                ))
            }
        };

        let migrated_keys = migrate_legacy_keys(&mut map);
        if !migrated_keys.is_empty() {
            info!(keys = ?migrated_keys, "migrated legacy settings keys");
        }

        let settings: Settings = serde_json::from_value(Value::Object(map))?;
        Ok(LoadedSettings {
            settings,
            migrated_keys,
        })
    }

    pub fn from_json_str(s: &str) -> FinCalcResult<LoadedSettings> {
        Self::from_value(serde_json::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> FinCalcResult<LoadedSettings> {
        Self::from_value(serde_yaml::from_str(s)?)
    }
}

/// Rewrite legacy keys in place and return the names that were rewritten.
/// A current key always wins over its legacy counterpart.
fn migrate_legacy_keys(map: &mut Map<String, Value>) -> Vec<String> {
    let mut migrated = Vec::new();

    for legacy in ["darkMode", "isDarkMode"] {
        if let Some(old) = map.remove(legacy) {
            if !map.contains_key("theme") {
                let theme = match old {
                    Value::Bool(true) => Some("dark"),
                    Value::Bool(false) => Some("light"),
                    Value::String(ref s) if s == "true" => Some("dark"),
                    Value::String(ref s) if s == "false" => Some("light"),
                    _ => None,
                };
                if let Some(theme) = theme {
                    map.insert("theme".into(), Value::String(theme.into()));
                }
            }
            migrated.push(legacy.to_string());
        }
    }

    for legacy in ["adPopupShown", "ad_popup_shown", "adPopupDismissed"] {
        if let Some(old) = map.remove(legacy) {
            if !map.contains_key("ad_popup_dismissed") {
                let dismissed = match old {
                    Value::Bool(b) => b,
                    Value::String(s) => s == "true",
                    _ => false,
                };
                map.insert("ad_popup_dismissed".into(), Value::Bool(dismissed));
            }
            migrated.push(legacy.to_string());
        }
    }

    if let Some(old) = map.remove("currencyCode") {
        if !map.contains_key("currency") {
            map.insert("currency".into(), old);
        }
        migrated.push("currencyCode".to_string());
    }

    migrated
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_object_gives_defaults() {
        let loaded = Settings::from_value(json!({})).unwrap();
        assert_eq!(loaded.settings, Settings::default());
        assert!(loaded.migrated_keys.is_empty());
    }

    #[test]
    fn test_null_gives_defaults() {
        let loaded = Settings::from_value(Value::Null).unwrap();
        assert_eq!(loaded.settings, Settings::default());
    }

    #[test]
    fn test_current_keys_load_directly() {
        let loaded = Settings::from_json_str(
            r#"{"theme":"dark","currency":"INR","zero_rate_policy":"straight","taxable_income_floor":"zero"}"#,
        )
        .unwrap();
        let s = loaded.settings;
        assert_eq!(s.theme, Theme::Dark);
        assert_eq!(s.currency, Currency::INR);
        assert_eq!(s.zero_rate_policy, ZeroRatePolicy::Straight);
        assert_eq!(s.taxable_income_floor, TaxableIncomeFloor::Zero);
    }

    #[test]
    fn test_legacy_dark_mode_becomes_theme() {
        let loaded = Settings::from_value(json!({"darkMode": true})).unwrap();
        assert_eq!(loaded.settings.theme, Theme::Dark);
        assert_eq!(loaded.migrated_keys, vec!["darkMode".to_string()]);

        let loaded = Settings::from_value(json!({"isDarkMode": "false"})).unwrap();
        assert_eq!(loaded.settings.theme, Theme::Light);
    }

    #[test]
    fn test_current_key_wins_over_legacy() {
        let loaded = Settings::from_value(json!({"darkMode": true, "theme": "light"})).unwrap();
        assert_eq!(loaded.settings.theme, Theme::Light);
        assert_eq!(loaded.migrated_keys, vec!["darkMode".to_string()]);
    }

    #[test]
    fn test_legacy_ad_popup_and_currency() {
        let loaded =
            Settings::from_value(json!({"adPopupShown": "true", "currencyCode": "eur"})).unwrap();
        assert!(loaded.settings.ad_popup_dismissed);
        assert_eq!(loaded.settings.currency, Currency::EUR);
        assert_eq!(
            loaded.migrated_keys,
            vec!["adPopupShown".to_string(), "currencyCode".to_string()]
        );
    }

    #[test]
    fn test_yaml_settings() {
        let loaded = Settings::from_yaml_str("darkMode: false\ncurrency: GBP\n").unwrap();
        assert_eq!(loaded.settings.theme, Theme::Light);
        assert_eq!(loaded.settings.currency, Currency::GBP);
    }

    #[test]
    fn test_migrated_settings_serialize_without_legacy_keys() {
        let loaded = Settings::from_value(json!({"darkMode": true})).unwrap();
        let value = serde_json::to_value(&loaded.settings).unwrap();
        assert_eq!(value["theme"], "dark");
        assert!(value.get("darkMode").is_none());
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(Settings::from_value(json!([1, 2])).is_err());
    }
}
