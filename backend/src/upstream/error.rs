//! Error types for upstream fetching and decoding.

use crate::series::SeriesError;

/// Result type for upstream operations
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Error type for talking to the upstream count API.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Transport-level failure (connection, timeout, TLS). Request URLs
    /// carry the API key, so the error never holds one.
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    /// The configured base URL and endpoint do not form a valid URL.
    #[error("Invalid upstream endpoint: {0}")]
    Endpoint(String),

    /// The API answered with an error status other than "no matches".
    #[error("Upstream returned status {status}: {message}")]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The body was not the expected JSON shape.
    #[error("Failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A result term could not be turned into an observation.
    #[error(transparent)]
    Series(#[from] SeriesError),

    /// The query itself is unusable (e.g. a reversed year range).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Http(err.without_url())
    }
}
