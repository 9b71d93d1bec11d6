//! Shared page chrome: navbar, footer, floating contact buttons.

pub mod chrome;
pub mod footer;
pub mod navbar;
pub mod whatsapp;

use std::sync::Arc;

use models::{Service, StatusFilter};

use crate::context::SiteContext;
use crate::errors::ServiceError;
use crate::pagination::{ServiceFilters, MAX_LIMIT};
use crate::query_cache::QueryKey;

pub use chrome::{ChromeQuery, Layout, PageChrome};
pub use footer::FooterView;
pub use navbar::{NavLink, NavbarState, NavbarView};
pub use whatsapp::WhatsAppFloat;

/// Active services in display order; shared by navbar and footer.
pub async fn active_services(ctx: &SiteContext) -> Result<Arc<Vec<Service>>, ServiceError> {
    let api = ctx.services.clone();
    ctx.cache
        .get_or_fetch(QueryKey::ActiveServices, || async move {
            let filters = ServiceFilters { limit: MAX_LIMIT, ..Default::default() }.with_status(StatusFilter::Active);
            let mut services = api.list_services(&filters).await?.data;
            services.sort_by_key(|s| s.display_order);
            Ok::<_, ServiceError>(services)
        })
        .await
}
