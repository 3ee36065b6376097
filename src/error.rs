use thiserror::Error;

#[cfg(feature = "web")]
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Failures of the file-backed preference store.
#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("preference file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Client-side fetch failures.
///
/// Kept free of any HTTP library types so the core compiles without `web`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(String),
}

#[cfg(feature = "web")]
impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            SourceError::Status(status.as_u16())
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}

/// Proxy handler errors. Upstream failures collapse into a static message per endpoint.
#[cfg(feature = "web")]
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to fetch recipes")]
    Recipes(#[source] reqwest::Error),

    #[error("Failed to fetch options")]
    Options(#[source] reqwest::Error),

    #[error("Missing category or area")]
    MissingFilter,
}

#[cfg(feature = "web")]
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Recipes(_) | AppError::Options(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MissingFilter => StatusCode::BAD_REQUEST,
        };

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(feature = "web")]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
