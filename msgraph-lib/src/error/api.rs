//! API error types

use super::HttpError;

/// Errors that can occur while executing a request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The response status was not one of the expected statuses.
    #[error(transparent)]
    Http(Box<HttpError>),

    /// Transport failure (connection, TLS, timeout). Passed through unchanged.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse API response.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

impl ApiError {
    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns `true` if this is a transport timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(err) if err.is_timeout())
    }

    /// Returns `true` if this error is potentially retryable.
    ///
    /// The client never retries on its own; this is a hint for callers
    /// implementing their own backoff.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(err) => err.is_retryable(),
            Self::Network(_) => true,
            _ => false,
        }
    }
}
