use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to the transit API
#[derive(Debug, Error)]
pub enum TransitError {
    /// Transport, TLS or body decoding failure inside reqwest
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API error {status}: {body}")]
    Api { status: StatusCode, body: String },

    /// A timestamp in the response is outside the representable range
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(i64),

    #[error("configuration error: {0}")]
    Config(String),
}
