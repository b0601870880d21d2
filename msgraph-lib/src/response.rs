//! Decoded responses

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::error::Error;

/// A decoded response body.
///
/// Bodies the server labels `application/json` are parsed; anything else
/// (MIME messages, file content, empty 204 bodies) is kept as raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Parsed JSON body.
    Json(Value),
    /// Raw body bytes.
    Bytes(Bytes),
}

impl Content {
    /// An empty raw body.
    pub fn empty() -> Self {
        Content::Bytes(Bytes::new())
    }

    /// Returns `true` if the body was decoded as JSON.
    pub fn is_json(&self) -> bool {
        matches!(self, Content::Json(_))
    }

    /// Returns the JSON body, if any.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Content::Json(value) => Some(value),
            Content::Bytes(_) => None,
        }
    }

    /// Returns the raw bytes, if the body was not JSON.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Content::Json(_) => None,
            Content::Bytes(bytes) => Some(bytes),
        }
    }

    /// Returns a top-level member of a JSON object body.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_json()?.get(key)
    }

    /// Consumes the content and returns the JSON body.
    ///
    /// Fails with a parse error when the body was not JSON.
    pub fn into_json(self) -> Result<Value, Error> {
        match self {
            Content::Json(value) => Ok(value),
            Content::Bytes(bytes) => Err(ApiError::parse_with_body(
                "expected a JSON body",
                String::from_utf8_lossy(&bytes),
            )
            .into()),
        }
    }

    /// Deserializes the JSON body into `T`.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, Error> {
        let value = self.into_json()?;
        serde_json::from_value(value).map_err(|e| ApiError::parse(e.to_string()).into())
    }
}

/// The result of a successful request: decoded body, status and headers.
///
/// # Example
///
/// ```ignore
/// let response = client.get_user("48d31887", &RequestOptions::new()).await?;
///
/// if response.status == StatusCode::OK {
///     println!("{:?}", response.content.get("displayName"));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    /// Decoded response body.
    pub content: Content,
    /// HTTP status code (always one of the expected statuses of the call).
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
}

impl Response {
    /// Returns a reference to the decoded body.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Consumes the response and returns the decoded body.
    pub fn into_content(self) -> Content {
        self.content
    }

    /// Consumes the response and returns `(content, status)`.
    pub fn into_parts(self) -> (Content, StatusCode) {
        (self.content, self.status)
    }

    /// Deserializes the JSON body into `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, Error> {
        self.content.deserialize()
    }
}
