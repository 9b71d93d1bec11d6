//! REST backend collaborators.
//!
//! The view models only see these traits. `http::HttpApiClient` is the real
//! implementation; `memory::InMemoryBackend` serves tests and local preview.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use models::{Paginated, PostFeed, Service, ServicePayload, ServiceUpdate};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;
use crate::pagination::ServiceFilters;

#[async_trait]
pub trait ServicesApi: Send + Sync {
    async fn list_services(&self, filters: &ServiceFilters) -> Result<Paginated<Service>, ServiceError>;
    async fn get_service(&self, id: i64) -> Result<Service, ServiceError>;
    async fn create_service(&self, payload: &ServicePayload) -> Result<Service, ServiceError>;
    async fn update_service(&self, id: i64, update: &ServiceUpdate) -> Result<Service, ServiceError>;
    async fn delete_service(&self, id: i64) -> Result<(), ServiceError>;
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlogFilters {
    pub status: String,
}

impl BlogFilters {
    pub fn published() -> Self {
        Self { status: "published".into() }
    }
}

impl Default for BlogFilters {
    fn default() -> Self {
        Self::published()
    }
}

#[async_trait]
pub trait BlogApi: Send + Sync {
    async fn list_posts(&self, filters: &BlogFilters) -> Result<PostFeed, ServiceError>;
}
