//! Authentication
//!
//! Client credentials token acquisition, managed tokens with background
//! refresh, and the bearer header sent with every authorized call.

mod client_credentials;
pub(crate) mod common;
mod manager;
mod token;

pub use client_credentials::ClientCredentials;
pub(crate) use client_credentials::ClientCredentialsFlow;
pub use common::DEFAULT_AUTHORITY;
pub use common::DEFAULT_SCOPE;
pub use manager::DEFAULT_REFRESH_INTERVAL_SECS;
pub use manager::MAX_REFRESH_INTERVAL_SECS;
pub use manager::MIN_REFRESH_INTERVAL_SECS;
pub use manager::TokenSource;
pub(crate) use manager::TokenManager;
pub use token::TokenPayload;
pub use token::bearer_header;
