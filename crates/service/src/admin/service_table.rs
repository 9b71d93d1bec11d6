//! Paged admin table of services.
//!
//! The table never patches rows locally. Every mutation goes to the backend,
//! then the services scope of the cache is dropped and the next `load`
//! refetches.

use std::sync::Arc;

use models::{PageMeta, Paginated, Service, ServiceIcon, ServiceUpdate, StatusFilter};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::context::SiteContext;
use crate::errors::ServiceError;
use crate::notify::{Confirm, Notifier};
use crate::pagination::ServiceFilters;
use crate::query_cache::{QueryKey, QueryScope};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableState {
    Loading,
    Empty,
    Populated,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServiceRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub icon: Option<ServiceIcon>,
    pub status_label: &'static str,
    pub is_active: bool,
    pub featured: bool,
    pub display_order: i64,
    pub feature_count: usize,
    /// Public page of the service.
    pub view_url: String,
}

impl ServiceRow {
    pub fn new(service: &Service, site_base_url: &str) -> Self {
        Self {
            id: service.id,
            title: service.title.clone(),
            slug: service.slug.clone(),
            icon: service.icon,
            status_label: if service.is_active { "Active" } else { "Inactive" },
            is_active: service.is_active,
            featured: service.featured,
            display_order: service.display_order,
            feature_count: service.feature_count(),
            view_url: format!("{}/services/{}", site_base_url.trim_end_matches('/'), service.slug),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageSummary {
    pub page: u64,
    pub pages: u64,
    pub total: u64,
    pub from: u64,
    pub to: u64,
    pub has_prev: bool,
    pub has_next: bool,
    pub label: String,
}

impl PageSummary {
    pub fn new(meta: &PageMeta, rows_on_page: usize) -> Self {
        let rows = rows_on_page as u64;
        let from = if rows == 0 { 0 } else { meta.page.saturating_sub(1).saturating_mul(meta.limit).saturating_add(1) };
        let to = if rows == 0 { 0 } else { from.saturating_add(rows - 1) };
        Self {
            page: meta.page,
            pages: meta.pages,
            total: meta.total,
            from,
            to,
            has_prev: meta.page > 1,
            has_next: meta.page < meta.pages,
            label: format!("Showing {from}-{to} of {}", meta.total),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServiceTableView {
    pub state: TableState,
    pub filters: ServiceFilters,
    pub rows: Vec<ServiceRow>,
    pub pagination: Option<PageSummary>,
}

#[derive(Clone, Debug, Default)]
pub struct ServiceTable {
    filters: ServiceFilters,
    page: Option<Arc<Paginated<Service>>>,
}

impl ServiceTable {
    pub fn new(filters: ServiceFilters) -> Self {
        Self { filters: filters.normalize(), page: None }
    }

    pub fn filters(&self) -> &ServiceFilters {
        &self.filters
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters = self.filters.clone().with_search(search);
        self.page = None;
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.filters = self.filters.clone().with_status(status);
        self.page = None;
    }

    pub fn set_page(&mut self, page: u32) {
        self.filters = self.filters.clone().with_page(page);
        self.page = None;
    }

    /// Fetch the current page through the query cache.
    #[instrument(skip(self, ctx), fields(page = self.filters.page, status = %self.filters.status))]
    pub async fn load(&mut self, ctx: &SiteContext) -> Result<ServiceTableView, ServiceError> {
        let filters = self.filters.clone();
        let api = ctx.services.clone();
        let page = ctx
            .cache
            .get_or_fetch(QueryKey::ServicePage(filters.clone()), || async move {
                api.list_services(&filters).await
            })
            .await?;
        self.page = Some(page);
        Ok(self.view(&ctx.site.base_url))
    }

    pub fn view(&self, site_base_url: &str) -> ServiceTableView {
        let Some(page) = &self.page else {
            return ServiceTableView {
                state: TableState::Loading,
                filters: self.filters.clone(),
                rows: Vec::new(),
                pagination: None,
            };
        };
        let rows: Vec<ServiceRow> = page.data.iter().map(|s| ServiceRow::new(s, site_base_url)).collect();
        ServiceTableView {
            state: if rows.is_empty() { TableState::Empty } else { TableState::Populated },
            filters: self.filters.clone(),
            pagination: Some(PageSummary::new(&page.pagination, rows.len())),
            rows,
        }
    }

    /// Flip `is_active` on the backend. Only the flag is sent.
    #[instrument(skip(ctx, notifier, row), fields(id = row.id))]
    pub async fn toggle_status(
        ctx: &SiteContext,
        row: &ServiceRow,
        notifier: &dyn Notifier,
    ) -> Result<Service, ServiceError> {
        let update = ServiceUpdate::Status { is_active: !row.is_active };
        match ctx.services.update_service(row.id, &update).await {
            Ok(saved) => {
                info!(event = "service_status_toggled", id = row.id, is_active = saved.is_active);
                ctx.cache.invalidate_scope(QueryScope::Services).await;
                notifier.success(if saved.is_active { "Service activated" } else { "Service deactivated" });
                Ok(saved)
            }
            Err(e) => {
                warn!(event = "service_status_toggle_failed", id = row.id, error = %e);
                notifier.error(&e.user_message("Failed to update service status"));
                Err(e)
            }
        }
    }

    /// Delete after explicit confirmation. A declined prompt sends nothing.
    #[instrument(skip(ctx, confirm, notifier, row), fields(id = row.id))]
    pub async fn delete(
        ctx: &SiteContext,
        row: &ServiceRow,
        confirm: &dyn Confirm,
        notifier: &dyn Notifier,
    ) -> Result<(), ServiceError> {
        let prompt = format!("Are you sure you want to delete \"{}\"?", row.title);
        if !confirm.confirm(&prompt) {
            info!(event = "service_delete_declined", id = row.id);
            return Err(ServiceError::Cancelled("delete not confirmed".into()));
        }
        match ctx.services.delete_service(row.id).await {
            Ok(()) => {
                info!(event = "service_deleted", id = row.id);
                ctx.cache.invalidate_scope(QueryScope::Services).await;
                notifier.success("Service deleted successfully");
                Ok(())
            }
            Err(e) => {
                warn!(event = "service_delete_failed", id = row.id, error = %e);
                notifier.error(&e.user_message("Failed to delete service"));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use configs::{CacheConfig, SiteConfig};

    use super::*;
    use crate::api::memory::{BackendCall, InMemoryBackend};
    use crate::notify::{Level, RecordingNotifier};

    fn svc(id: i64, title: &str, active: bool) -> Service {
        Service {
            id,
            title: title.into(),
            slug: models::slug::slugify(title),
            is_active: active,
            display_order: id,
            ..Default::default()
        }
    }

    async fn ctx_with(services: Vec<Service>) -> (SiteContext, Arc<InMemoryBackend>) {
        let backend = Arc::new(InMemoryBackend::new().with_services(services).await);
        let site = SiteConfig { base_url: "https://studio.test/".into(), ..Default::default() };
        let ctx = SiteContext::with_backend(backend.clone(), &CacheConfig::default(), site);
        (ctx, backend)
    }

    #[test]
    fn unloaded_table_is_loading() {
        let table = ServiceTable::default();
        let view = table.view("https://studio.test");
        assert_eq!(view.state, TableState::Loading);
        assert!(view.pagination.is_none());
    }

    #[test]
    fn summary_of_a_middle_page() {
        let s = PageSummary::new(&PageMeta::new(2, 10, 25), 10);
        assert_eq!(s.label, "Showing 11-20 of 25");
        assert!(s.has_prev && s.has_next);
        let s = PageSummary::new(&PageMeta::new(1, 10, 0), 0);
        assert_eq!(s.label, "Showing 0-0 of 0");
        assert!(!s.has_next);
    }

    #[test]
    fn summary_saturates_on_absurd_page_numbers() {
        let s = PageSummary::new(&PageMeta::new(u64::MAX, 100, 5), 5);
        assert_eq!(s.from, u64::MAX);
        assert_eq!(s.to, u64::MAX);
    }

    #[tokio::test]
    async fn load_builds_rows_and_caches_the_page() {
        let (ctx, backend) = ctx_with(vec![svc(1, "Web Design", true), svc(2, "SEO", false)]).await;
        let mut table = ServiceTable::default();
        let view = table.load(&ctx).await.unwrap();
        assert_eq!(view.state, TableState::Populated);
        assert_eq!(view.rows[1].status_label, "Inactive");
        assert_eq!(view.rows[0].view_url, "https://studio.test/services/web-design");
        assert_eq!(view.pagination.unwrap().label, "Showing 1-2 of 2");

        table.load(&ctx).await.unwrap();
        assert_eq!(backend.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn filtered_to_nothing_is_empty() {
        let (ctx, _) = ctx_with(vec![svc(1, "Web Design", true)]).await;
        let mut table = ServiceTable::default();
        table.set_status(StatusFilter::Inactive);
        let view = table.load(&ctx).await.unwrap();
        assert_eq!(view.state, TableState::Empty);
    }

    #[tokio::test]
    async fn toggle_sends_the_opposite_flag() {
        let (ctx, backend) = ctx_with(vec![svc(1, "Web Design", true), svc(2, "SEO", false)]).await;
        let notifier = RecordingNotifier::new();
        let mut table = ServiceTable::default();
        let view = table.load(&ctx).await.unwrap();

        ServiceTable::toggle_status(&ctx, &view.rows[0], &notifier).await.unwrap();
        ServiceTable::toggle_status(&ctx, &view.rows[1], &notifier).await.unwrap();
        let updates: Vec<BackendCall> = backend
            .calls()
            .await
            .into_iter()
            .filter(|c| matches!(c, BackendCall::UpdateService(..)))
            .collect();
        assert_eq!(
            updates,
            vec![
                BackendCall::UpdateService(1, ServiceUpdate::Status { is_active: false }),
                BackendCall::UpdateService(2, ServiceUpdate::Status { is_active: true }),
            ]
        );

        // the cached page was dropped, so the next load shows server state
        let view = table.load(&ctx).await.unwrap();
        assert!(!view.rows[0].is_active);
        assert!(view.rows[1].is_active);
        assert_eq!(notifier.take()[0].message, "Service deactivated");
    }

    #[tokio::test]
    async fn declined_delete_never_calls_backend() {
        let (ctx, backend) = ctx_with(vec![svc(1, "Web Design", true)]).await;
        let notifier = RecordingNotifier::new();
        let row = ServiceRow::new(&svc(1, "Web Design", true), "");
        let no = |_: &str| false;
        let err = ServiceTable::delete(&ctx, &row, &no, &notifier).await.unwrap_err();
        assert!(matches!(err, ServiceError::Cancelled(_)));
        assert!(backend.calls().await.is_empty());
        assert!(backend.service(1).await.is_some());
    }

    #[tokio::test]
    async fn confirmed_delete_removes_and_notifies() {
        let (ctx, backend) = ctx_with(vec![svc(1, "Web Design", true)]).await;
        let notifier = RecordingNotifier::new();
        let row = ServiceRow::new(&svc(1, "Web Design", true), "");
        let yes = |prompt: &str| prompt.contains("Web Design");
        ServiceTable::delete(&ctx, &row, &yes, &notifier).await.unwrap();
        assert!(backend.service(1).await.is_none());
        assert_eq!(notifier.take()[0].level, Level::Success);
    }

    #[tokio::test]
    async fn failed_delete_reports_and_keeps_row() {
        let (ctx, backend) = ctx_with(vec![svc(1, "Web Design", true)]).await;
        backend.fail_next(500, "").await;
        let notifier = RecordingNotifier::new();
        let row = ServiceRow::new(&svc(1, "Web Design", true), "");
        let yes = |_: &str| true;
        assert!(ServiceTable::delete(&ctx, &row, &yes, &notifier).await.is_err());
        assert!(backend.service(1).await.is_some());
        assert_eq!(notifier.take()[0].message, "Failed to delete service");
    }
}
