//! OData query construction.
//!
//! This module provides the expression model and the query builder used to
//! shape list requests against Microsoft Graph.
//!
//! # Types
//!
//! - [`Constraint`] - A single comparison rendered from its [`Operator`] template
//! - [`Filter`] - Constraints joined by a [`Connector`]
//! - [`OrderBy`] - Ordering specification for query results
//! - [`ODataQuery`] - `$count`, `$expand`, `$filter`, `$select`, `$top`, `$orderby`

mod constraint;
mod filter;
mod odata;
mod order;

pub use constraint::Constraint;
pub use constraint::Operator;
pub use filter::Connector;
pub use filter::Filter;
pub use odata::EMPTY_QUERY;
pub use odata::ODataQuery;
pub use order::Direction;
pub use order::OrderBy;
