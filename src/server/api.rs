//! Request payloads and response bodies for the HTTP surface.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::SettingsError;
use crate::rewards::settings::coerce_number;

pub const DEFAULT_ATTACK_COUNT: usize = 100;
pub const MAX_ATTACK_COUNT: usize = 1000;

pub fn health_payload() -> Value {
    json!({
        "status": "ok",
        "service": "warpay",
        "version": env!("CARGO_PKG_VERSION")
    })
}

pub fn no_data_payload() -> Value {
    json!({
        "status": "no_data",
        "message": "No concluded ranked war found for this faction"
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLogRequest {
    #[serde(default)]
    api_key: String,
    #[serde(default)]
    count: Option<Value>,
    #[serde(default)]
    min_respect: Option<Value>,
}

/// Body of `POST /api/attacks` and `POST /api/mugs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRequest {
    pub api_key: String,
    pub count: usize,
    pub min_respect: Option<f64>,
}

impl LogRequest {
    /// Count defaults to [DEFAULT_ATTACK_COUNT] when missing or unusable and is
    /// capped at [MAX_ATTACK_COUNT].
    pub fn from_json(body: &str) -> Result<Self, SettingsError> {
        let raw: RawLogRequest =
            serde_json::from_str(body).map_err(|err| SettingsError::Parse(err.to_string()))?;
        let api_key = raw.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(SettingsError::MissingApiKey);
        }

        let count = raw
            .count
            .as_ref()
            .map(coerce_number)
            .filter(|count| *count >= 1.0)
            .map_or(DEFAULT_ATTACK_COUNT, |count| count as usize)
            .min(MAX_ATTACK_COUNT);
        let min_respect = raw
            .min_respect
            .as_ref()
            .map(coerce_number)
            .filter(|min| *min > 0.0);

        Ok(Self {
            api_key,
            count,
            min_respect,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_request_defaults_and_caps_count() {
        let request = LogRequest::from_json(r#"{"apiKey":"k"}"#).expect("valid");
        assert_eq!(request.count, DEFAULT_ATTACK_COUNT);
        assert_eq!(request.min_respect, None);

        let request = LogRequest::from_json(r#"{"apiKey":"k","count":"5000","minRespect":"2.5"}"#)
            .expect("valid");
        assert_eq!(request.count, MAX_ATTACK_COUNT);
        assert_eq!(request.min_respect, Some(2.5));

        let request = LogRequest::from_json(r#"{"apiKey":"k","count":"abc"}"#).expect("valid");
        assert_eq!(request.count, DEFAULT_ATTACK_COUNT);
    }

    #[test]
    fn log_request_requires_key() {
        assert_eq!(
            LogRequest::from_json(r#"{"count":10}"#),
            Err(SettingsError::MissingApiKey)
        );
    }
}
