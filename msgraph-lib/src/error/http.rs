//! Typed HTTP status failures

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use reqwest::header::RETRY_AFTER;

use super::GraphErrorDetail;
use crate::response::Content;

/// The closed set of HTTP failures the Graph API is known to return.
///
/// Any status outside the table maps to [`HttpErrorKind::UnknownError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    NotAcceptable,
    Conflict,
    Gone,
    LengthRequired,
    PreconditionFailed,
    RequestEntityTooLarge,
    UnsupportedMediaType,
    RequestedRangeNotSatisfiable,
    UnprocessableEntity,
    TooManyRequests,
    InternalServerError,
    NotImplemented,
    ServiceUnavailable,
    GatewayTimeout,
    InsufficientStorage,
    UnknownError,
}

impl HttpErrorKind {
    /// Selects the error kind for a status code.
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            406 => Self::NotAcceptable,
            409 => Self::Conflict,
            410 => Self::Gone,
            411 => Self::LengthRequired,
            412 => Self::PreconditionFailed,
            413 => Self::RequestEntityTooLarge,
            415 => Self::UnsupportedMediaType,
            416 => Self::RequestedRangeNotSatisfiable,
            422 => Self::UnprocessableEntity,
            429 => Self::TooManyRequests,
            500 => Self::InternalServerError,
            501 => Self::NotImplemented,
            503 => Self::ServiceUnavailable,
            504 => Self::GatewayTimeout,
            507 => Self::InsufficientStorage,
            _ => Self::UnknownError,
        }
    }

    /// Returns the name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BadRequest => "BadRequest",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "NotFound",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::NotAcceptable => "NotAcceptable",
            Self::Conflict => "Conflict",
            Self::Gone => "Gone",
            Self::LengthRequired => "LengthRequired",
            Self::PreconditionFailed => "PreconditionFailed",
            Self::RequestEntityTooLarge => "RequestEntityTooLarge",
            Self::UnsupportedMediaType => "UnsupportedMediaType",
            Self::RequestedRangeNotSatisfiable => "RequestedRangeNotSatisfiable",
            Self::UnprocessableEntity => "UnprocessableEntity",
            Self::TooManyRequests => "TooManyRequests",
            Self::InternalServerError => "InternalServerError",
            Self::NotImplemented => "NotImplemented",
            Self::ServiceUnavailable => "ServiceUnavailable",
            Self::GatewayTimeout => "GatewayTimeout",
            Self::InsufficientStorage => "InsufficientStorage",
            Self::UnknownError => "UnknownError",
        }
    }
}

impl std::fmt::Display for HttpErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A response whose status fell outside the expected set for the call.
///
/// Carries everything needed to inspect the failure: the status, the URL that
/// was requested, the decoded body and the response headers.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: HTTP {} for {url}", .status.as_u16())]
pub struct HttpError {
    /// The kind selected from the status table.
    pub kind: HttpErrorKind,
    /// HTTP status code.
    pub status: StatusCode,
    /// The request URL.
    pub url: String,
    /// Decoded response body (JSON when the server said so, raw bytes otherwise).
    pub content: Content,
    /// Response headers.
    pub headers: HeaderMap,
}

impl HttpError {
    /// Creates a new HTTP error, selecting its kind from the status.
    pub fn new(status: StatusCode, url: impl Into<String>, content: Content, headers: HeaderMap) -> Self {
        Self {
            kind: HttpErrorKind::from_status(status),
            status,
            url: url.into(),
            content,
            headers,
        }
    }

    /// Decodes the error envelope of the body, if there is one.
    pub fn detail(&self) -> Option<GraphErrorDetail> {
        self.content.as_json().and_then(GraphErrorDetail::from_json)
    }

    /// Returns the `Retry-After` delay sent with 429/503 responses.
    pub fn retry_after(&self) -> Option<Duration> {
        self.headers
            .get(RETRY_AFTER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }

    /// Returns `true` for statuses a caller may reasonably retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self.status.as_u16(), 429 | 500 | 502 | 503 | 504)
    }
}
