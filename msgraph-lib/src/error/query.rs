//! OData expression error types

/// Errors raised while constructing OData expressions.
///
/// All of these are reported eagerly, when the expression is built, never when
/// it is rendered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// A name or value that must not be empty was empty.
    #[error("{what} must not be empty")]
    Empty { what: &'static str },

    /// `any_eq` was used without an inner attribute.
    #[error("Operator '{operator}' requires an inner attribute")]
    MissingInnerAttribute { operator: &'static str },

    /// An inner attribute was given for an operator that does not take one.
    #[error("Operator '{operator}' does not take an inner attribute")]
    UnexpectedInnerAttribute { operator: &'static str },

    /// More than one constraint but no connector.
    #[error("A connector is required to join {count} constraints")]
    MissingConnector { count: usize },

    /// A connector was given for a single constraint.
    #[error("A single constraint cannot have a connector")]
    UnexpectedConnector,

    /// Operator name outside the supported set.
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// Connector name other than `and` / `or`.
    #[error("Unknown connector: {0}")]
    UnknownConnector(String),

    /// Direction name other than `asc` / `desc`.
    #[error("Unknown direction: {0}")]
    UnknownDirection(String),
}
