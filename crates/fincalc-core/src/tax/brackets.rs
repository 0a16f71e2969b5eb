use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FinCalcError;
use crate::types::{Money, Rate};
use crate::FinCalcResult;

/// A configured bracket: income up to `upper_bound` is taxed at `marginal_rate`.
/// `None` marks the open-ended top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_bound: Option<Money>,
    pub marginal_rate: Rate,
}

/// A resolved bracket with its lower edge and the fixed tax owed on all
/// income below that edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub lower_bound: Money,
    pub upper_bound: Option<Money>,
    pub marginal_rate: Rate,
    pub base_tax: Money,
}

impl Band {
    pub fn contains(&self, income: Money) -> bool {
        income > self.lower_bound && self.upper_bound.map_or(true, |upper| income <= upper)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScheduleConfig {
    name: String,
    brackets: Vec<TaxBracket>,
}

/// An ordered progressive rate schedule for one jurisdiction and year.
///
/// Schedules are data: build one with [`TaxSchedule::from_brackets`] or
/// deserialize `{ "name": ..., "brackets": [{ "upper_bound": ..., "marginal_rate": ... }] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleConfig", into = "ScheduleConfig")]
pub struct TaxSchedule {
    name: String,
    bands: Vec<Band>,
}

impl TryFrom<ScheduleConfig> for TaxSchedule {
    type Error = FinCalcError;

    fn try_from(config: ScheduleConfig) -> Result<Self, Self::Error> {
        TaxSchedule::from_brackets(config.name, &config.brackets)
    }
}

impl From<TaxSchedule> for ScheduleConfig {
    fn from(schedule: TaxSchedule) -> Self {
        let brackets = schedule.brackets();
        ScheduleConfig {
            name: schedule.name,
            brackets,
        }
    }
}

impl TaxSchedule {
    /// Validate the brackets and accumulate each band's base tax.
    pub fn from_brackets(name: impl Into<String>, brackets: &[TaxBracket]) -> FinCalcResult<Self> {
        if brackets.is_empty() {
            return Err(FinCalcError::InsufficientData(
                "a tax schedule needs at least one bracket".into(),
            ));
        }

        let mut lower = Decimal::ZERO;

        for (i, bracket) in brackets.iter().enumerate() {
            let is_last = i + 1 == brackets.len();

            if bracket.marginal_rate < Decimal::ZERO || bracket.marginal_rate > Decimal::ONE {
                return Err(FinCalcError::invalid(
                    format!("brackets[{i}].marginal_rate"),
                    "marginal_rate must be within [0, 1]",
                ));
            }

            match (bracket.upper_bound, is_last) {
                (None, false) => {
                    return Err(FinCalcError::invalid(
                        format!("brackets[{i}].upper_bound"),
                        "only the top bracket may be unbounded",
                    ));
                }
                (Some(_), true) => {
                    return Err(FinCalcError::invalid(
                        format!("brackets[{i}].upper_bound"),
                        "the top bracket must be unbounded",
                    ));
                }
                (Some(upper), false) if upper <= lower => {
                    return Err(FinCalcError::invalid(
                        format!("brackets[{i}].upper_bound"),
                        format!("upper bounds must ascend (got {upper} after {lower})"),
                    ));
                }
                _ => {}
            }

            if let Some(upper) = bracket.upper_bound {
                lower = upper;
            }
        }

        Ok(Self::accumulate(name, brackets))
    }

    fn accumulate(name: impl Into<String>, brackets: &[TaxBracket]) -> Self {
        let mut bands = Vec::with_capacity(brackets.len());
        let mut lower = Decimal::ZERO;
        let mut base_tax = Decimal::ZERO;

        for bracket in brackets {
            bands.push(Band {
                lower_bound: lower,
                upper_bound: bracket.upper_bound,
                marginal_rate: bracket.marginal_rate,
                base_tax,
            });

            if let Some(upper) = bracket.upper_bound {
                base_tax += (upper - lower) * bracket.marginal_rate;
                lower = upper;
            }
        }

        TaxSchedule {
            name: name.into(),
            bands,
        }
    }

    /// The five-band US-style 2024 schedule used by the income tax calculator.
    pub fn us_2024() -> Self {
        let brackets = [
            TaxBracket { upper_bound: Some(dec!(11000)), marginal_rate: dec!(0) },
            TaxBracket { upper_bound: Some(dec!(44725)), marginal_rate: dec!(0.12) },
            TaxBracket { upper_bound: Some(dec!(95375)), marginal_rate: dec!(0.22) },
            TaxBracket { upper_bound: Some(dec!(182100)), marginal_rate: dec!(0.24) },
            TaxBracket { upper_bound: None, marginal_rate: dec!(0.32) },
        ];
        Self::accumulate("US 2024", &brackets)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// The configured brackets this schedule was built from.
    pub fn brackets(&self) -> Vec<TaxBracket> {
        self.bands
            .iter()
            .map(|band| TaxBracket {
                upper_bound: band.upper_bound,
                marginal_rate: band.marginal_rate,
            })
            .collect()
    }

    /// Band whose range holds `income`; income at or below zero maps to the first band.
    pub fn band_for(&self, income: Money) -> &Band {
        self.bands
            .iter()
            .find(|band| band.contains(income))
            .unwrap_or(&self.bands[0])
    }

    pub fn from_json_str(s: &str) -> FinCalcResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> FinCalcResult<Self> {
        Ok(serde_yaml::from_str(s)?)
    }
}

impl Default for TaxSchedule {
    fn default() -> Self {
        Self::us_2024()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_us_2024_base_amounts() {
        let schedule = TaxSchedule::us_2024();
        let bases: Vec<Money> = schedule.bands().iter().map(|b| b.base_tax).collect();
        // 0; 33725*0.12; +50650*0.22; +86725*0.24
        assert_eq!(bases, vec![dec!(0), dec!(0), dec!(4047), dec!(15190), dec!(36004)]);
        let lowers: Vec<Money> = schedule.bands().iter().map(|b| b.lower_bound).collect();
        assert_eq!(lowers, vec![dec!(0), dec!(11000), dec!(44725), dec!(95375), dec!(182100)]);
    }

    #[test]
    fn test_us_2024_passes_validation() {
        let schedule = TaxSchedule::us_2024();
        let rebuilt = TaxSchedule::from_brackets("US 2024", &schedule.brackets()).unwrap();
        assert_eq!(rebuilt, schedule);
    }

    #[test]
    fn test_band_for_uses_inclusive_upper_edges() {
        let schedule = TaxSchedule::us_2024();
        assert_eq!(schedule.band_for(dec!(11000)).marginal_rate, dec!(0));
        assert_eq!(schedule.band_for(dec!(11000.01)).marginal_rate, dec!(0.12));
        assert_eq!(schedule.band_for(dec!(1000000)).marginal_rate, dec!(0.32));
        assert_eq!(schedule.band_for(dec!(-50)).marginal_rate, dec!(0));
    }

    #[test]
    fn test_rejects_empty_schedule() {
        assert!(matches!(
            TaxSchedule::from_brackets("empty", &[]),
            Err(FinCalcError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_rejects_descending_bounds() {
        let brackets = [
            TaxBracket { upper_bound: Some(dec!(100)), marginal_rate: dec!(0.1) },
            TaxBracket { upper_bound: Some(dec!(50)), marginal_rate: dec!(0.2) },
            TaxBracket { upper_bound: None, marginal_rate: dec!(0.3) },
        ];
        assert!(TaxSchedule::from_brackets("bad", &brackets).is_err());
    }

    #[test]
    fn test_rejects_bounded_top_and_unbounded_middle() {
        let bounded_top = [TaxBracket { upper_bound: Some(dec!(100)), marginal_rate: dec!(0.1) }];
        assert!(TaxSchedule::from_brackets("bad", &bounded_top).is_err());

        let open_middle = [
            TaxBracket { upper_bound: None, marginal_rate: dec!(0.1) },
            TaxBracket { upper_bound: None, marginal_rate: dec!(0.2) },
        ];
        assert!(TaxSchedule::from_brackets("bad", &open_middle).is_err());
    }

    #[test]
    fn test_rejects_rate_above_one() {
        let brackets = [TaxBracket { upper_bound: None, marginal_rate: dec!(1.5) }];
        assert!(TaxSchedule::from_brackets("bad", &brackets).is_err());
    }

    #[test]
    fn test_schedule_loads_from_json_and_yaml() {
        let json = r#"{"name":"flat","brackets":[{"upper_bound":"1000","marginal_rate":"0"},{"upper_bound":null,"marginal_rate":"0.2"}]}"#;
        let from_json = TaxSchedule::from_json_str(json).unwrap();
        assert_eq!(from_json.name(), "flat");
        assert_eq!(from_json.bands()[1].lower_bound, dec!(1000));

        let yaml = "name: flat\nbrackets:\n  - upper_bound: '1000'\n    marginal_rate: '0'\n  - upper_bound: null\n    marginal_rate: '0.2'\n";
        let from_yaml = TaxSchedule::from_yaml_str(yaml).unwrap();
        assert_eq!(from_yaml, from_json);
    }

    #[test]
    fn test_invalid_json_schedule_is_rejected() {
        let json = r#"{"name":"bad","brackets":[]}"#;
        assert!(TaxSchedule::from_json_str(json).is_err());
    }

    #[test]
    fn test_schedule_serializes_back_to_brackets() {
        let value = serde_json::to_value(TaxSchedule::us_2024()).unwrap();
        assert_eq!(value["name"], "US 2024");
        assert_eq!(value["brackets"].as_array().unwrap().len(), 5);
        assert!(value["brackets"][4]["upper_bound"].is_null());
    }
}
