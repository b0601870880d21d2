//! Request execution
//!
//! This module contains the single HTTP call used by every operation: send,
//! decode, and classify the status against the expected set.

use std::time::Duration;

use bytes::Bytes;
use log::debug;
use log::error;
use reqwest::Client;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use serde_json::Value;
use url::Url;

use crate::GraphClient;
use crate::error::ApiError;
use crate::error::Error;
use crate::error::HttpError;
use crate::response::Content;
use crate::response::Response;

/// Statuses treated as success when a call does not say otherwise.
pub const DEFAULT_EXPECTED_STATUSES: [StatusCode; 3] =
    [StatusCode::OK, StatusCode::CREATED, StatusCode::NO_CONTENT];

/// Body of an outgoing request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Serialized as JSON.
    Json(Value),
    /// Serialized as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
}

/// Sends requests and classifies responses.
///
/// Cheap to clone; shared by the client and the token refresh task.
#[derive(Debug, Clone)]
pub(crate) struct Executor {
    http_client: Client,
    timeout: Option<Duration>,
    logging: bool,
}

impl Executor {
    pub(crate) fn new(http_client: Client, timeout: Option<Duration>, logging: bool) -> Self {
        Self {
            http_client,
            timeout,
            logging,
        }
    }

    /// Issues one HTTP call.
    ///
    /// Transport failures are logged and returned unchanged. A status outside
    /// `expected_statuses` becomes an [`HttpError`] carrying the request URL and
    /// the decoded body and headers of the response.
    pub(crate) async fn execute(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<RequestBody>,
        expected_statuses: &[StatusCode],
    ) -> Result<Response, Error> {
        let parsed = Url::parse(url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", url, e)))?;

        let mut request = self.http_client.request(method.clone(), parsed).headers(headers);

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        request = match body {
            Some(RequestBody::Json(value)) => request.json(&value),
            Some(RequestBody::Form(params)) => request.form(&params),
            None => request,
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                if self.logging {
                    error!("exception while making a request to {} {}: {}", method, url, e);
                }
                return Err(ApiError::Network(e).into());
            }
        };

        let status = response.status();
        let response_headers = response.headers().clone();
        let is_json = is_json_content(&response_headers);

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                if self.logging {
                    error!("exception while reading the response of {} {}: {}", method, url, e);
                }
                return Err(ApiError::Network(e).into());
            }
        };

        if expected_statuses.contains(&status) {
            let content = decode_content(is_json, bytes)?;
            Ok(Response {
                content,
                status,
                headers: response_headers,
            })
        } else {
            // A malformed error body must not hide the status.
            let content = decode_content(is_json, bytes.clone()).unwrap_or(Content::Bytes(bytes));
            let err = HttpError::new(status, url, content, response_headers);
            if self.logging {
                debug!("{} {} failed: {}", method, url, err);
            }
            Err(err.into())
        }
    }
}

fn is_json_content(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

fn decode_content(is_json: bool, bytes: Bytes) -> Result<Content, ApiError> {
    if !is_json || bytes.is_empty() {
        return Ok(Content::Bytes(bytes));
    }

    serde_json::from_slice(&bytes)
        .map(Content::Json)
        .map_err(|e| ApiError::parse_with_body(e.to_string(), String::from_utf8_lossy(&bytes)))
}

impl GraphClient {
    /// Executes one HTTP call and classifies the response.
    ///
    /// No authorization is added; resolve it with [`GraphClient::authorization`]
    /// when calling Graph. `expected_statuses` defaults to 200, 201 and 204.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let headers = client.authorization(&options)?;
    /// let response = client
    ///     .execute(Method::GET, &url, headers, None, None)
    ///     .await?;
    /// ```
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<RequestBody>,
        expected_statuses: Option<&[StatusCode]>,
    ) -> Result<Response, Error> {
        self.executor()
            .execute(
                method,
                url,
                headers,
                body,
                expected_statuses.unwrap_or(&DEFAULT_EXPECTED_STATUSES),
            )
            .await
    }
}
