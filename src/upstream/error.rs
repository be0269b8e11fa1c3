//! Error definitions for upstream calls.

use thiserror::Error;

/// Errors that can occur while talking to Stubo.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// A required parameter is missing or malformed. Raised before any
    /// network traffic happens.
    #[error("{0}")]
    Validation(String),

    /// Stubo is unreachable or the connection failed mid-flight.
    #[error("request to Stubo failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Stubo returned a body that is not the expected JSON shape.
    #[error("failed to decode Stubo response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl UpstreamError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
