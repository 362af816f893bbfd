//! Error types for the Gemini API client.

use thiserror::Error;

/// Errors that can occur when generating text.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gemini returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// Status name from the API, e.g. `INVALID_ARGUMENT`.
        status: String,
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The client could not be built from its configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No API key is configured.
    #[error("text generation is not configured")]
    NotConfigured,
}

/// Error body returned by the Gemini API.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<u16>,
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}
