//! Page layout: navbar on top, footer below, floating buttons and the
//! scroll-to-top button over the content.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::footer::FooterView;
use super::navbar::{NavbarState, NavbarView};
use super::whatsapp::WhatsAppFloat;
use crate::context::SiteContext;

pub const SCROLL_TOP_THRESHOLD: u32 = 300;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChromeQuery {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub scroll_y: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageChrome {
    pub navbar: NavbarView,
    pub footer: FooterView,
    pub whatsapp: WhatsAppFloat,
    pub scroll_to_top: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Layout {
    navbar: NavbarState,
    scroll_y: u32,
}

impl Layout {
    pub fn new(query: &ChromeQuery) -> Self {
        let mut layout = Self { navbar: NavbarState::new(query.path.as_deref().unwrap_or("/")), scroll_y: 0 };
        if let Some(y) = query.scroll_y {
            layout.on_scroll(y);
        }
        layout
    }

    pub fn navbar(&self) -> &NavbarState {
        &self.navbar
    }

    pub fn navbar_mut(&mut self) -> &mut NavbarState {
        &mut self.navbar
    }

    pub fn on_scroll(&mut self, y: u32) {
        self.scroll_y = y;
        self.navbar.on_scroll(y);
    }

    pub fn scroll_to_top_visible(&self) -> bool {
        self.scroll_y > SCROLL_TOP_THRESHOLD
    }

    /// Compose the chrome. A failed services fetch degrades to an empty
    /// dropdown and the static footer list; it never fails the page.
    pub async fn render(&self, ctx: &SiteContext) -> PageChrome {
        let services = match super::active_services(ctx).await {
            Ok(list) => Some(list),
            Err(e) => {
                warn!(event = "chrome_services_unavailable", error = %e);
                None
            }
        };
        let list = services.as_deref().map(Vec::as_slice);
        let scroll_to_top = self.scroll_to_top_visible();
        PageChrome {
            navbar: self.navbar.view(list.unwrap_or_default()),
            footer: FooterView::new(list, &ctx.site, Utc::now().year()),
            whatsapp: WhatsAppFloat::new(&ctx.site, scroll_to_top),
            scroll_to_top,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use configs::{CacheConfig, SiteConfig};
    use models::Service;

    use super::*;
    use crate::api::memory::InMemoryBackend;

    async fn ctx(services: Vec<Service>) -> (SiteContext, Arc<InMemoryBackend>) {
        let backend = Arc::new(InMemoryBackend::new().with_services(services).await);
        let site = SiteConfig { whatsapp_number: "15550100".into(), ..Default::default() };
        (SiteContext::with_backend(backend.clone(), &CacheConfig::default(), site), backend)
    }

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

    #[tokio::test]
    async fn chrome_lists_only_active_services() {
        let (ctx, _) = ctx(vec![svc(1, "Web", true), svc(2, "Hidden", false), svc(3, "SEO", true)]).await;
        let chrome = Layout::new(&ChromeQuery { path: Some("/services/web".into()), scroll_y: None }).render(&ctx).await;
        let dropdown: Vec<&str> = chrome.navbar.links[2].children.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(dropdown, vec!["Web", "SEO"]);
        assert_eq!(chrome.footer.services.len(), 2);
        assert!(!chrome.footer.fallback);
        assert!(!chrome.scroll_to_top);
    }

    #[tokio::test]
    async fn backend_failure_uses_fallbacks() {
        let (ctx, backend) = ctx(vec![svc(1, "Web", true)]).await;
        backend.fail_next(503, "down").await;
        let chrome = Layout::default().render(&ctx).await;
        assert!(chrome.navbar.links[2].children.is_empty());
        assert!(chrome.footer.fallback);
    }

    #[tokio::test]
    async fn scrolled_page_shows_scroll_to_top_and_lifts_buttons() {
        let (ctx, _) = ctx(vec![]).await;
        let chrome = Layout::new(&ChromeQuery { path: None, scroll_y: Some(450) }).render(&ctx).await;
        assert!(chrome.scroll_to_top);
        assert!(chrome.navbar.scrolled);
        assert!(chrome.whatsapp.bottom_offset > crate::layout::whatsapp::BASE_OFFSET);
        assert!(chrome.whatsapp.whatsapp_url.is_some());
    }
}
