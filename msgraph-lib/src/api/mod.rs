//! Graph API operations

mod endpoint;
mod execute;
mod options;
mod pages;
pub mod query;
mod resources;

pub use endpoint::*;
pub use execute::*;
pub use options::*;
pub use pages::*;
pub use resources::*;
