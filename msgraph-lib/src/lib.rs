//! Microsoft Graph client library
//!
//! A Rust async client library for the Microsoft Graph REST API: OData query
//! construction, cursor pagination and delta sync, and client credentials
//! token management.

pub mod api;
pub mod auth;
pub mod error;
pub mod response;

mod client;

pub use client::*;
pub use error::Error;
pub use response::Content;
pub use response::Response;
