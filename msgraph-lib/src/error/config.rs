//! Configuration error types

/// Errors caused by invalid constructor or setter arguments.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Token refresh interval outside the allowed range.
    #[error("Refresh interval must be between {min} and {max} seconds, got {value}")]
    RefreshInterval { value: u64, min: u64, max: u64 },

    /// A configured URL is not an absolute http(s) URL.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// An operation argument is missing or inconsistent with the others.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ConfigError {
    /// Creates a new invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
