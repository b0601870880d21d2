//! Ordering types for OData queries.

use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the name used when rendering.
    pub fn name(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl FromStr for Direction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(QueryError::UnknownDirection(s.to_string())),
        }
    }
}

/// Specifies the ordering of query results.
///
/// Renders as `{attribute} {direction}`; further fields can be chained for
/// secondary sorting and are joined with commas.
///
/// # Example
///
/// ```
/// use msgraph_lib::api::query::OrderBy;
///
/// let order = OrderBy::desc("receivedDateTime");
/// assert_eq!(order.render(), "receivedDateTime desc");
///
/// let order = OrderBy::desc("receivedDateTime").then_asc("subject");
/// assert_eq!(order.render(), "receivedDateTime desc,subject asc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    fields: Vec<(String, Direction)>,
}

impl OrderBy {
    /// Creates an ordering on a field.
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            fields: vec![(field.into(), direction)],
        }
    }

    /// Creates an ascending order on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Asc)
    }

    /// Creates a descending order on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Desc)
    }

    /// Adds a secondary ascending order on a field.
    pub fn then_asc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), Direction::Asc));
        self
    }

    /// Adds a secondary descending order on a field.
    pub fn then_desc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), Direction::Desc));
        self
    }

    /// Returns the ordered fields with their directions.
    pub fn fields(&self) -> &[(String, Direction)] {
        &self.fields
    }

    /// Renders the `$orderby` value.
    pub fn render(&self) -> String {
        self.fields
            .iter()
            .map(|(field, direction)| format!("{} {}", field, direction.name()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
