//! Error types

mod api;
mod auth;
mod config;
mod graph;
mod http;
mod query;

pub use api::*;
pub use auth::*;
pub use config::*;
pub use graph::*;
pub use http::*;
pub use query::*;

use reqwest::StatusCode;

/// The error type returned by every fallible operation of the client.
///
/// Each concern has its own error enum; `?` lifts all of them into this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad constructor or setter argument.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Token lifecycle misuse or token acquisition failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Malformed OData expression.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Failure while executing an HTTP request.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A delta traversal ended without the server providing a `@odata.deltaLink`.
    #[error("Missing @odata.deltaLink after iterating through all pages")]
    MissingDeltaLink,
}

impl Error {
    /// Returns the typed HTTP error, if this is one.
    pub fn as_http(&self) -> Option<&HttpError> {
        match self {
            Self::Api(ApiError::Http(err)) => Some(err),
            _ => None,
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<StatusCode> {
        self.as_http().map(|err| err.status)
    }

    /// Returns the kind of HTTP error, if this is one.
    pub fn http_kind(&self) -> Option<HttpErrorKind> {
        self.as_http().map(|err| err.kind)
    }
}

impl From<HttpError> for Error {
    fn from(err: HttpError) -> Self {
        Error::Api(ApiError::Http(Box::new(err)))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Api(ApiError::Network(err))
    }
}
