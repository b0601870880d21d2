//! Filters: constraints joined by a logical connector.

use std::fmt;
use std::str::FromStr;

use super::Constraint;
use crate::error::QueryError;

/// Logical connector joining the constraints of a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connector {
    /// `a and b`
    And,
    /// `a or b`
    Or,
}

impl Connector {
    /// Returns the lowercase name used when rendering.
    pub fn name(self) -> &'static str {
        match self {
            Connector::And => "and",
            Connector::Or => "or",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Connector {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(Connector::And),
            "or" => Ok(Connector::Or),
            _ => Err(QueryError::UnknownConnector(s.to_string())),
        }
    }
}

/// An ordered list of constraints rendered as one `$filter` expression.
///
/// A single constraint takes no connector; two or more need one. The
/// invariant is checked when the filter is built.
///
/// # Example
///
/// ```
/// use msgraph_lib::api::query::{Connector, Constraint, Filter, Operator};
///
/// let filter = Filter::new(
///     [
///         Constraint::new("city", Operator::Ne, "New-York")?,
///         Constraint::new("displayName", Operator::Eq, "Noam")?,
///     ],
///     Some(Connector::Or),
/// )?;
///
/// assert_eq!(filter.render(), "city ne New-York or displayName eq Noam");
/// # Ok::<(), msgraph_lib::error::QueryError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    constraints: Vec<Constraint>,
    connector: Option<Connector>,
}

impl Filter {
    /// Creates a filter, checking the connector against the constraint count.
    ///
    /// A filter without constraints is accepted with or without a connector and
    /// is left out of the rendered query.
    pub fn new(
        constraints: impl IntoIterator<Item = Constraint>,
        connector: Option<Connector>,
    ) -> Result<Self, QueryError> {
        let constraints: Vec<Constraint> = constraints.into_iter().collect();

        match (constraints.len(), connector) {
            (1, Some(_)) => return Err(QueryError::UnexpectedConnector),
            (count, None) if count > 1 => return Err(QueryError::MissingConnector { count }),
            _ => {}
        }

        Ok(Self {
            constraints,
            connector,
        })
    }

    /// Creates a filter holding one constraint.
    pub fn single(constraint: Constraint) -> Self {
        Self {
            constraints: vec![constraint],
            connector: None,
        }
    }

    /// Creates a filter joining constraints with `and`.
    pub fn all(constraints: impl IntoIterator<Item = Constraint>) -> Result<Self, QueryError> {
        Self::joined(constraints, Connector::And)
    }

    /// Creates a filter joining constraints with `or`.
    pub fn any(constraints: impl IntoIterator<Item = Constraint>) -> Result<Self, QueryError> {
        Self::joined(constraints, Connector::Or)
    }

    fn joined(
        constraints: impl IntoIterator<Item = Constraint>,
        connector: Connector,
    ) -> Result<Self, QueryError> {
        let constraints: Vec<Constraint> = constraints.into_iter().collect();
        if constraints.len() == 1 {
            Self::new(constraints, None)
        } else {
            Self::new(constraints, Some(connector))
        }
    }

    /// Returns the constraints in order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Returns the connector, if any.
    pub fn connector(&self) -> Option<Connector> {
        self.connector
    }

    /// Returns `true` if there are no constraints.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Returns the number of constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Renders the constraints joined by the connector.
    pub fn render(&self) -> String {
        let separator = match self.connector {
            Some(connector) => format!(" {} ", connector.name()),
            None => String::new(),
        };

        self.constraints
            .iter()
            .map(Constraint::render)
            .collect::<Vec<_>>()
            .join(&separator)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
