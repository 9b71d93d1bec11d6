//! In-process backend for tests and local preview.
//!
//! Behaves like the REST backend closely enough for the view models: paging,
//! search, status filter, id assignment for new services and features. Every
//! call is recorded so tests can assert what was (or was not) sent.

use std::collections::BTreeMap;

use async_trait::async_trait;
use models::{CategoryCount, Feature, PageMeta, Paginated, Post, PostFeed, Service, ServicePayload, ServiceUpdate};
use tokio::sync::Mutex;

use super::{BlogApi, BlogFilters, ServicesApi};
use crate::errors::ServiceError;
use crate::pagination::ServiceFilters;

#[derive(Clone, Debug, PartialEq)]
pub enum BackendCall {
    ListServices(ServiceFilters),
    GetService(i64),
    CreateService(ServicePayload),
    UpdateService(i64, ServiceUpdate),
    DeleteService(i64),
    ListPosts(BlogFilters),
}

#[derive(Default)]
struct MemoryState {
    services: BTreeMap<i64, Service>,
    posts: Vec<Post>,
    category_counts: Vec<CategoryCount>,
    next_service_id: i64,
    next_feature_id: i64,
    calls: Vec<BackendCall>,
    fail_next: Option<(u16, String)>,
}

impl MemoryState {
    fn assign_feature_ids(&mut self, features: &mut [Feature]) {
        for f in features.iter_mut().filter(|f| f.id.is_none()) {
            self.next_feature_id += 1;
            f.id = Some(self.next_feature_id);
        }
    }

    fn take_failure(&mut self) -> Result<(), ServiceError> {
        match self.fail_next.take() {
            Some((status, message)) => Err(ServiceError::Api { status, message }),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<MemoryState>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_services(self, services: Vec<Service>) -> Self {
        {
            let mut st = self.state.lock().await;
            for mut s in services {
                if s.id == 0 {
                    st.next_service_id += 1;
                    s.id = st.next_service_id;
                }
                st.next_service_id = st.next_service_id.max(s.id);
                let max_feature = s.features.iter().filter_map(|f| f.id).max().unwrap_or(0);
                st.next_feature_id = st.next_feature_id.max(max_feature);
                st.services.insert(s.id, s);
            }
        }
        self
    }

    pub async fn with_posts(self, posts: Vec<Post>, category_counts: Vec<CategoryCount>) -> Self {
        {
            let mut st = self.state.lock().await;
            st.posts = posts;
            st.category_counts = category_counts;
        }
        self
    }

    /// Make the next call fail with this status and message.
    pub async fn fail_next(&self, status: u16, message: impl Into<String>) {
        self.state.lock().await.fail_next = Some((status, message.into()));
    }

    pub async fn calls(&self) -> Vec<BackendCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn service(&self, id: i64) -> Option<Service> {
        self.state.lock().await.services.get(&id).cloned()
    }
}

fn matches_search(s: &Service, needle: &str) -> bool {
    needle.is_empty()
        || [&s.title, &s.slug, &s.short_description]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

#[async_trait]
impl ServicesApi for InMemoryBackend {
    async fn list_services(&self, filters: &ServiceFilters) -> Result<Paginated<Service>, ServiceError> {
        let mut st = self.state.lock().await;
        st.calls.push(BackendCall::ListServices(filters.clone()));
        st.take_failure()?;

        let needle = filters.search.trim().to_lowercase();
        let mut matching: Vec<&Service> = st
            .services
            .values()
            .filter(|s| filters.status.matches(s) && matches_search(s, &needle))
            .collect();
        matching.sort_by(|a, b| a.display_order.cmp(&b.display_order).then(a.id.cmp(&b.id)));

        let total = matching.len() as u64;
        let data = matching
            .into_iter()
            .skip(filters.offset() as usize)
            .take(filters.limit as usize)
            .cloned()
            .collect();
        Ok(Paginated { data, pagination: PageMeta::new(u64::from(filters.page), u64::from(filters.limit), total) })
    }

    async fn get_service(&self, id: i64) -> Result<Service, ServiceError> {
        let mut st = self.state.lock().await;
        st.calls.push(BackendCall::GetService(id));
        st.take_failure()?;
        st.services.get(&id).cloned().ok_or_else(|| ServiceError::not_found("service"))
    }

    async fn create_service(&self, payload: &ServicePayload) -> Result<Service, ServiceError> {
        let mut st = self.state.lock().await;
        st.calls.push(BackendCall::CreateService(payload.clone()));
        st.take_failure()?;

        st.next_service_id += 1;
        let mut created = payload.clone().into_service(st.next_service_id);
        if st.services.values().any(|s| s.slug == created.slug) {
            return Err(ServiceError::Api { status: 409, message: "Slug already exists".into() });
        }
        st.assign_feature_ids(&mut created.features);
        st.services.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_service(&self, id: i64, update: &ServiceUpdate) -> Result<Service, ServiceError> {
        let mut st = self.state.lock().await;
        st.calls.push(BackendCall::UpdateService(id, update.clone()));
        st.take_failure()?;

        let existing = st.services.get(&id).cloned().ok_or_else(|| ServiceError::not_found("service"))?;
        let mut updated = match update {
            ServiceUpdate::Status { is_active } => Service { is_active: *is_active, ..existing },
            ServiceUpdate::Full(payload) => {
                let mut next = payload.clone().into_service(id);
                if payload.slug.is_none() {
                    next.slug = existing.slug;
                }
                next
            }
        };
        st.assign_feature_ids(&mut updated.features);
        st.services.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_service(&self, id: i64) -> Result<(), ServiceError> {
        let mut st = self.state.lock().await;
        st.calls.push(BackendCall::DeleteService(id));
        st.take_failure()?;
        st.services.remove(&id).map(|_| ()).ok_or_else(|| ServiceError::not_found("service"))
    }
}

#[async_trait]
impl BlogApi for InMemoryBackend {
    async fn list_posts(&self, filters: &BlogFilters) -> Result<PostFeed, ServiceError> {
        let mut st = self.state.lock().await;
        st.calls.push(BackendCall::ListPosts(filters.clone()));
        st.take_failure()?;
        let posts = st
            .posts
            .iter()
            .filter(|p| p.status.is_empty() || p.status.eq_ignore_ascii_case(&filters.status))
            .cloned()
            .collect();
        Ok(PostFeed { posts, category_counts: st.category_counts.clone() })
    }
}
