//! Internal error types for API operations.
//!
//! These errors are internal to `parlance-http` and are mapped to core port
//! errors at the boundary.

use thiserror::Error;

/// Result type alias for API operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// Errors related to evaluation service requests.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The service answered with a non-success status.
    #[error("API request failed with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        /// HTTP status code
        status: u16,
        /// The `error` field of the response body, if any
        message: Option<String>,
    },

    /// The service returned an invalid or unexpected response.
    #[error("Invalid response from API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl HttpError {
    /// HTTP status of a rejected request.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
