//! The `ODataQuery` aggregate and its query-string rendering.

use std::fmt;

use super::Filter;
use super::OrderBy;
use crate::error::QueryError;

/// What [`ODataQuery::render`] returns when no option is set.
pub const EMPTY_QUERY: &str = "EMPTY OPEN DATA QUERY";

/// OData system query options for one request.
///
/// Options are independent and all optional. Rendering always emits them in
/// the same order (`$count`, `$expand`, `$filter`, `$select`, `$top`,
/// `$orderby`) regardless of the order they were set in, so a given set of
/// options always produces the same URL.
///
/// # Example
///
/// ```
/// use msgraph_lib::api::query::ODataQuery;
///
/// let mut query = ODataQuery::new();
/// query.set_top(10);
/// query.set_select(["subject", "sender"])?;
///
/// assert_eq!(query.render(), "?$select=subject,sender&$top=10");
/// # Ok::<(), msgraph_lib::error::QueryError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ODataQuery {
    count: Option<bool>,
    expand: Option<String>,
    filter: Option<Filter>,
    select: Option<Vec<String>>,
    top: Option<u32>,
    order_by: Option<OrderBy>,
}

impl ODataQuery {
    /// Creates a query with no options set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the `$count` option.
    pub fn count(&self) -> Option<bool> {
        self.count
    }

    /// Requests the total count of matching resources (`$count=true`).
    ///
    /// `false` is the server default and renders nothing.
    pub fn set_count(&mut self, count: bool) -> &mut Self {
        self.count = Some(count);
        self
    }

    /// Returns the `$expand` option.
    pub fn expand(&self) -> Option<&str> {
        self.expand.as_deref()
    }

    /// Retrieves related resources (`$expand=...`).
    pub fn set_expand(&mut self, expand: impl Into<String>) -> Result<&mut Self, QueryError> {
        let expand = expand.into();
        if expand.is_empty() {
            return Err(QueryError::Empty { what: "expand" });
        }
        self.expand = Some(expand);
        Ok(self)
    }

    /// Returns the `$filter` option.
    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// Filters results (rows). A filter without constraints renders nothing.
    pub fn set_filter(&mut self, filter: Filter) -> &mut Self {
        self.filter = Some(filter);
        self
    }

    /// Returns the `$select` columns.
    pub fn select(&self) -> Option<&[String]> {
        self.select.as_deref()
    }

    /// Filters properties (columns). Column names must not be empty.
    pub fn set_select<I, S>(&mut self, columns: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.iter().any(String::is_empty) {
            return Err(QueryError::Empty {
                what: "select column",
            });
        }
        self.select = Some(columns);
        Ok(self)
    }

    /// Returns the `$top` option.
    pub fn top(&self) -> Option<u32> {
        self.top
    }

    /// Sets the page size of results (`$top=n`).
    pub fn set_top(&mut self, top: u32) -> &mut Self {
        self.top = Some(top);
        self
    }

    /// Returns the `$orderby` option.
    pub fn order_by(&self) -> Option<&OrderBy> {
        self.order_by.as_ref()
    }

    /// Orders results (`$orderby=...`).
    pub fn set_order_by(&mut self, order_by: OrderBy) -> &mut Self {
        self.order_by = Some(order_by);
        self
    }

    /// Returns `true` if rendering would produce no segment.
    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    /// Renders the query string, starting with `?`.
    ///
    /// Returns [`EMPTY_QUERY`] when no option is set. Use
    /// [`ODataQuery::pairs`] when building URLs.
    pub fn render(&self) -> String {
        self.query_string()
            .unwrap_or_else(|| EMPTY_QUERY.to_string())
    }

    /// Renders the query string, or `None` when no option is set.
    pub fn query_string(&self) -> Option<String> {
        let segments: Vec<String> = self
            .pairs()
            .into_iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();

        if segments.is_empty() {
            None
        } else {
            Some(format!("?{}", segments.join("&")))
        }
    }

    /// Returns the set options as `(name, value)` pairs, in rendering order.
    ///
    /// Values are unencoded.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if self.count == Some(true) {
            pairs.push(("$count", "true".to_string()));
        }

        if let Some(ref expand) = self.expand {
            pairs.push(("$expand", expand.clone()));
        }

        if let Some(ref filter) = self.filter {
            if !filter.is_empty() {
                pairs.push(("$filter", filter.render()));
            }
        }

        if let Some(ref select) = self.select {
            if !select.is_empty() {
                pairs.push(("$select", select.join(",")));
            }
        }

        if let Some(top) = self.top {
            pairs.push(("$top", top.to_string()));
        }

        if let Some(ref order_by) = self.order_by {
            pairs.push(("$orderby", order_by.render()));
        }

        pairs
    }
}

impl fmt::Display for ODataQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
