//! Per-call request options.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;

use super::query::ODataQuery;
use super::GraphUrl;
use super::DEFAULT_EXPECTED_STATUSES;

/// Options shared by every authorized operation.
///
/// # Example
///
/// ```ignore
/// let mut query = ODataQuery::new();
/// query.set_top(10);
///
/// let options = RequestOptions::new()
///     .with_token(token)
///     .with_query(query)
///     .with_header(HeaderName::from_static("consistencylevel"), HeaderValue::from_static("eventual"));
///
/// let users = client.list_users_bulk(&options).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Bearer token for this call. Falls back to the managed token when `None`
    /// or empty.
    pub token: Option<String>,
    /// Headers added after the authorization and content-type headers.
    pub extra_headers: HeaderMap,
    /// Statuses treated as success. Defaults to 200, 201 and 204.
    pub expected_statuses: Option<Vec<StatusCode>>,
    /// OData options for operations addressing a collection.
    pub query: Option<ODataQuery>,
}

impl RequestOptions {
    /// Creates new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an explicit token for this call.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Adds an extra header. Repeating a name keeps every value.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.extra_headers.append(name, value);
        self
    }

    /// Overrides the statuses treated as success.
    pub fn with_expected_statuses(mut self, statuses: impl IntoIterator<Item = StatusCode>) -> Self {
        self.expected_statuses = Some(statuses.into_iter().collect());
        self
    }

    /// Attaches OData options.
    pub fn with_query(mut self, query: ODataQuery) -> Self {
        self.query = Some(query);
        self
    }

    /// Returns the statuses treated as success for this call.
    pub fn expected_statuses(&self) -> &[StatusCode] {
        self.expected_statuses
            .as_deref()
            .unwrap_or(&DEFAULT_EXPECTED_STATUSES)
    }

    /// Attaches the OData options of this call to a URL.
    pub(crate) fn apply_query(&self, url: GraphUrl) -> GraphUrl {
        match self.query {
            Some(ref query) => url.query(query),
            None => url,
        }
    }
}
