use thiserror::Error;

/// Failure talking to the Torn API. Absence of data is never an error; these
/// cover transport, decoding and errors reported by the API itself.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("torn api error {code}: {message}")]
    Remote { code: i64, message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("an api key is required")]
    MissingApiKey,

    #[error("invalid settings payload: {0}")]
    Parse(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
