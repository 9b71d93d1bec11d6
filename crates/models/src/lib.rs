//! Domain entities shared by the site and the admin dashboard.
//!
//! Everything here is plain data: wire shapes read from the REST backend,
//! payloads written back to it, and the validation rules both sides agree on.

pub mod de;
pub mod errors;
pub mod icon;
pub mod pagination;
pub mod post;
pub mod service;
pub mod slug;
pub mod tags;
pub mod validation;

pub use icon::ServiceIcon;
pub use pagination::{PageMeta, Paginated};
pub use post::{CategoryCount, Post, PostFeed};
pub use service::{Feature, FeaturePayload, Service, ServicePayload, ServiceUpdate, StatusFilter};
pub use tags::Tags;
pub use validation::FieldErrors;
