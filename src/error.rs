//! Error types for the windfield application.
//!
//! The interpolation core never fails on well-shaped input; these errors
//! cover the boundaries around it: configuration, upstream fetches, the
//! snapshot file and HTTP request parameters.

use axum::http::StatusCode;
use thiserror::Error;

/// The main error type for windfield operations.
#[derive(Error, Debug)]
pub enum WindfieldError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Data not found errors
    #[error("Data not found: {message}")]
    DataNotFound { message: String },

    /// Upstream API answered with a non-success status
    #[error("{source_name} API error: {status} {body}")]
    Fetch {
        source_name: String,
        status: u16,
        body: String,
    },

    /// Transport-level HTTP client errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server errors
    #[error("Server error: {message}")]
    Server { message: String },
}

/// Convenience type alias for Results with WindfieldError
pub type Result<T> = std::result::Result<T, WindfieldError>;

impl WindfieldError {
    /// HTTP status used when this error ends a request
    pub fn status_code(&self) -> StatusCode {
        match self {
            WindfieldError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            WindfieldError::DataNotFound { .. } => StatusCode::NOT_FOUND,
            WindfieldError::Fetch { .. } | WindfieldError::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Shorthand for an [`WindfieldError::InvalidParameter`].
    pub fn invalid_parameter(param: &str, message: impl Into<String>) -> Self {
        WindfieldError::InvalidParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }
}
