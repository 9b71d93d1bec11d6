use std::sync::Arc;

use configs::{AppConfig, CacheConfig, SiteConfig};
use tracing::info;

use crate::api::http::HttpApiClient;
use crate::api::{BlogApi, ServicesApi};
use crate::errors::ServiceError;
use crate::query_cache::QueryCache;

/// Everything a view model needs: backend clients, the shared query cache and
/// static site content. Cheap to clone.
#[derive(Clone)]
pub struct SiteContext {
    pub services: Arc<dyn ServicesApi>,
    pub blog: Arc<dyn BlogApi>,
    pub cache: QueryCache,
    pub site: Arc<SiteConfig>,
}

impl SiteContext {
    /// Context over the HTTP backend named in the configuration.
    pub fn from_config(cfg: &AppConfig) -> Result<Self, ServiceError> {
        let client = Arc::new(HttpApiClient::new(&cfg.backend)?);
        info!(event = "backend_client_ready", base_url = %client.base_url(), "backend client configured");
        Ok(Self::with_backend(client, &cfg.cache, cfg.site.clone()))
    }

    /// Context over any backend that serves both services and posts.
    pub fn with_backend<B>(backend: Arc<B>, cache: &CacheConfig, site: SiteConfig) -> Self
    where
        B: ServicesApi + BlogApi + 'static,
    {
        Self {
            services: backend.clone(),
            blog: backend,
            cache: QueryCache::new(cache),
            site: Arc::new(site),
        }
    }
}
