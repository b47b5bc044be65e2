//! API client error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the newtab backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a status the caller did not expect.
    #[error("API error: {status} - {message}")]
    Status { status: StatusCode, message: String },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// The HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            Self::Decode(_) | Self::InvalidBaseUrl(_) => None,
        }
    }
}
