//! View-model layer of the studio site and its admin dashboard.
//! - Talks to the REST backend through the `api` traits.
//! - Keeps fetched data in an explicit, keyed `QueryCache`.
//! - Turns backend data plus user input into serializable views.

pub mod admin;
pub mod api;
pub mod blog;
pub mod context;
pub mod errors;
pub mod layout;
pub mod metrics;
pub mod notify;
pub mod pagination;
pub mod query_cache;

pub use context::SiteContext;
pub use errors::ServiceError;
