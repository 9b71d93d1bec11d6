//! Keyed cache of backend query results.
//!
//! Each entry is keyed by the request signature that produced it. Writes never
//! patch entries in place: after a successful mutation the caller invalidates
//! a single key, a whole scope, or everything, and the next read refetches.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use configs::CacheConfig;
use models::{Paginated, PostFeed, Service};
use moka::future::Cache;
use moka::Expiry;
use tracing::debug;

use crate::errors::ServiceError;
use crate::metrics::{CACHE_HITS_TOTAL, CACHE_INVALIDATIONS_TOTAL, CACHE_MISSES_TOTAL};
use crate::pagination::ServiceFilters;

/// Request signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// One admin table page.
    ServicePage(ServiceFilters),
    /// One service with its features.
    Service(i64),
    /// Active services for the navbar and footer.
    ActiveServices,
    /// Blog feed for a post status.
    Posts { status: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryScope {
    Services,
    Blog,
}

impl QueryKey {
    pub fn scope(&self) -> QueryScope {
        match self {
            QueryKey::ServicePage(_) | QueryKey::Service(_) | QueryKey::ActiveServices => QueryScope::Services,
            QueryKey::Posts { .. } => QueryScope::Blog,
        }
    }
}

#[derive(Clone, Debug)]
pub enum CachedValue {
    ServicePage(Arc<Paginated<Service>>),
    Service(Arc<Service>),
    ServiceList(Arc<Vec<Service>>),
    Posts(Arc<PostFeed>),
}

/// Types that can live in the cache.
pub trait Cacheable: Send + Sync + Sized + 'static {
    fn wrap(value: Arc<Self>) -> CachedValue;
    fn unwrap(value: CachedValue) -> Option<Arc<Self>>;
}

macro_rules! cacheable {
    ($ty:ty, $variant:ident) => {
        impl Cacheable for $ty {
            fn wrap(value: Arc<Self>) -> CachedValue {
                CachedValue::$variant(value)
            }

            fn unwrap(value: CachedValue) -> Option<Arc<Self>> {
                match value {
                    CachedValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

cacheable!(Paginated<Service>, ServicePage);
cacheable!(Service, Service);
cacheable!(Vec<Service>, ServiceList);
cacheable!(PostFeed, Posts);

/// Per-scope time to live.
struct ScopeTtl {
    services: Duration,
    blog: Duration,
}

impl Expiry<QueryKey, CachedValue> for ScopeTtl {
    fn expire_after_create(&self, key: &QueryKey, _value: &CachedValue, _created_at: Instant) -> Option<Duration> {
        Some(match key.scope() {
            QueryScope::Services => self.services,
            QueryScope::Blog => self.blog,
        })
    }
}

#[derive(Clone)]
pub struct QueryCache {
    inner: Cache<QueryKey, CachedValue>,
}

impl QueryCache {
    pub fn new(cfg: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(cfg.max_capacity)
            .expire_after(ScopeTtl {
                services: Duration::from_secs(cfg.services_ttl_secs),
                blog: Duration::from_secs(cfg.blog_ttl_secs),
            })
            .build();
        Self { inner }
    }

    pub async fn get<T: Cacheable>(&self, key: &QueryKey) -> Option<Arc<T>> {
        self.inner.get(key).await.and_then(T::unwrap)
    }

    pub async fn insert<T: Cacheable>(&self, key: QueryKey, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.inner.insert(key, T::wrap(Arc::clone(&value))).await;
        value
    }

    /// Cached value, or run `fetch` and cache its success. Errors are not cached.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<Arc<T>, ServiceError>
    where
        T: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        if let Some(hit) = self.get::<T>(&key).await {
            CACHE_HITS_TOTAL.inc();
            debug!(event = "cache_hit", key = ?key);
            return Ok(hit);
        }
        CACHE_MISSES_TOTAL.inc();
        debug!(event = "cache_miss", key = ?key);
        let fresh = fetch().await?;
        Ok(self.insert(key, fresh).await)
    }

    pub async fn invalidate(&self, key: &QueryKey) {
        CACHE_INVALIDATIONS_TOTAL.inc();
        debug!(event = "cache_invalidate", key = ?key);
        self.inner.invalidate(key).await;
    }

    /// Drop every entry of one scope.
    pub async fn invalidate_scope(&self, scope: QueryScope) {
        CACHE_INVALIDATIONS_TOTAL.inc();
        let keys: Vec<QueryKey> = self
            .inner
            .iter()
            .filter(|(k, _)| k.scope() == scope)
            .map(|(k, _)| (*k).clone())
            .collect();
        debug!(event = "cache_invalidate_scope", scope = ?scope, count = keys.len());
        for key in keys {
            self.inner.invalidate(&key).await;
        }
    }

    pub fn invalidate_all(&self) {
        CACHE_INVALIDATIONS_TOTAL.inc();
        debug!(event = "cache_invalidate_all");
        self.inner.invalidate_all();
    }

    /// Approximate; pending maintenance may lag behind.
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}
