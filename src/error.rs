use std::fmt;

use serde_json::Value;

/// Body carried by a failed backend call, kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiErrorBody {
    Json(Value),
    Text(String),
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorBody::Json(value) => write!(f, "{value}"),
            ApiErrorBody::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    #[error("{0}")]
    Network(String),
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        body: ApiErrorBody,
    },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl AppError {
    /// Status code of a backend rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
