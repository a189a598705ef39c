//! Error types for admission, transport and client construction.

use std::time::Duration;

/// No permit became available within the admission timeout.
///
/// Recoverable: the caller may retry later. Nothing is retried internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Rate limit exceeded: no permit available after {waited:?}")]
pub struct RateLimitExceeded {
    pub waited: Duration,
}

/// Failure talking to the registration endpoint.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by [`SubmissionClient::submit`](crate::SubmissionClient::submit).
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    RateLimitExceeded(#[from] RateLimitExceeded),
    #[error("Failed to encode document: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Endpoint returned status {status}")]
    Remote { status: u16, body: String },
    #[error("Client is shut down")]
    ShutDown,
}

impl SubmitError {
    /// Whether the call was refused before any request was sent.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::RateLimitExceeded(_) | Self::ShutDown)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("No tokio runtime available to drive the replenish cycle")]
    NoRuntime,
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
