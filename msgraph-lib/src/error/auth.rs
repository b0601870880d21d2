//! Authentication error types

use super::Error;

/// Errors related to the bearer token lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No per-call token was given and the client does not manage one.
    #[error("Token is not managed so it must be provided explicitly")]
    AuthenticationRequired,

    /// `manage_token` was called while a refresh task is already running.
    #[error("Token is already managed")]
    AlreadyManaged,

    /// The initial acquisition of a managed token failed.
    #[error("Failed to start token management: {0}")]
    TokenManagement(#[source] Box<Error>),

    /// The token endpoint answered successfully but without an `access_token`.
    #[error("Token response did not contain an access_token")]
    MissingAccessToken,

    /// The token cannot be used as an HTTP header value.
    #[error("Token contains characters that are not valid in a header")]
    InvalidToken,
}
