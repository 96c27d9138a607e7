//! User-supplied payout settings and their lenient numeric parsing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::SettingsError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PayoutType {
    /// Attack pool split by raw attack count.
    #[default]
    PerAttack,
    /// Attack pool split by respect earned.
    PerRespect,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub attack_rewards: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub assist_rewards: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub med_out_rewards: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub revive_rewards: f64,
    #[serde(default)]
    pub payout_type: PayoutType,
    #[serde(default)]
    pub ignore_chain_bonus: bool,
    #[serde(default, deserialize_with = "lenient_number")]
    pub min_med_outs: f64,
}

impl RewardSettings {
    /// Parses a settings payload, coercing unusable numbers to zero and
    /// rejecting a blank API key.
    pub fn from_json(input: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(input).map_err(|err| SettingsError::Parse(err.to_string()))?;
        settings.validated()
    }

    pub fn validated(mut self) -> Result<Self, SettingsError> {
        self.api_key = self.api_key.trim().to_string();
        if self.api_key.is_empty() {
            return Err(SettingsError::MissingApiKey);
        }
        Ok(self)
    }
}

/// Numbers pass through; numeric strings are parsed after trimming; anything
/// else (empty, whitespace, text, null, NaN) becomes `0`.
pub fn coerce_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|number| number.is_finite()).unwrap_or(0.0)
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_number(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_and_invalid_numbers_become_zero() {
        let settings = RewardSettings::from_json(
            r#"{"apiKey":"k","attackRewards":"","assistRewards":"abc","medOutRewards":"!!!",
                "reviveRewards":"   ","minMedOuts":"\t"}"#,
        )
        .expect("settings should parse");

        assert_eq!(settings.attack_rewards, 0.0);
        assert_eq!(settings.assist_rewards, 0.0);
        assert_eq!(settings.med_out_rewards, 0.0);
        assert_eq!(settings.revive_rewards, 0.0);
        assert_eq!(settings.min_med_outs, 0.0);
    }

    #[test]
    fn numeric_strings_and_numbers_are_accepted() {
        let settings = RewardSettings::from_json(
            r#"{"apiKey":" k ","attackRewards":" 1500 ","assistRewards":250,
                "payoutType":"perRespect","ignoreChainBonus":true,"minMedOuts":"3"}"#,
        )
        .expect("settings should parse");

        assert_eq!(settings.api_key, "k");
        assert_eq!(settings.attack_rewards, 1500.0);
        assert_eq!(settings.assist_rewards, 250.0);
        assert_eq!(settings.payout_type, PayoutType::PerRespect);
        assert!(settings.ignore_chain_bonus);
        assert_eq!(settings.min_med_outs, 3.0);
    }

    #[test]
    fn missing_api_key_is_rejected() {
        assert_eq!(
            RewardSettings::from_json(r#"{"apiKey":"  ","attackRewards":10}"#),
            Err(SettingsError::MissingApiKey)
        );
        assert_eq!(
            RewardSettings::from_json(r#"{}"#),
            Err(SettingsError::MissingApiKey)
        );
    }

    #[test]
    fn coerce_number_handles_non_numeric_values() {
        assert_eq!(coerce_number(&json!(null)), 0.0);
        assert_eq!(coerce_number(&json!(true)), 0.0);
        assert_eq!(coerce_number(&json!("NaN")), 0.0);
        assert_eq!(coerce_number(&json!("12.5")), 12.5);
    }
}
