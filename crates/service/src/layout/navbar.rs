//! Navbar state machine.
//!
//! Scroll handling: `scrolled` past 20px; hidden while scrolling down beyond
//! 100px, shown again on any upward scroll. The open mobile drawer locks body
//! scroll and pins the bar visible.

use models::Service;
use serde::Serialize;

pub const SCROLLED_THRESHOLD: u32 = 20;
pub const HIDE_THRESHOLD: u32 = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub active: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavLink>,
}

impl NavLink {
    fn new(label: &str, href: &str, path: &str) -> Self {
        Self { label: label.to_string(), href: href.to_string(), active: is_active(href, path), children: Vec::new() }
    }
}

fn is_active(href: &str, path: &str) -> bool {
    if href == "/" {
        return path == "/";
    }
    path == href || path.strip_prefix(href).is_some_and(|rest| rest.starts_with('/'))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavbarView {
    pub links: Vec<NavLink>,
    pub scrolled: bool,
    pub hidden: bool,
    pub drawer_open: bool,
    pub dropdown_open: bool,
    pub body_scroll_locked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavbarState {
    path: String,
    last_scroll_y: u32,
    scrolled: bool,
    hidden: bool,
    drawer_open: bool,
    dropdown_open: bool,
}

impl Default for NavbarState {
    fn default() -> Self {
        Self::new("/")
    }
}

impl NavbarState {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            last_scroll_y: 0,
            scrolled: false,
            hidden: false,
            drawer_open: false,
            dropdown_open: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn drawer_open(&self) -> bool {
        self.drawer_open
    }

    /// Body scroll is locked exactly while the drawer is open.
    pub fn body_scroll_locked(&self) -> bool {
        self.drawer_open
    }

    pub fn on_scroll(&mut self, y: u32) {
        self.scrolled = y > SCROLLED_THRESHOLD;
        if self.drawer_open {
            self.hidden = false;
        } else if y > self.last_scroll_y && y > HIDE_THRESHOLD {
            self.hidden = true;
        } else if y < self.last_scroll_y {
            self.hidden = false;
        }
        self.last_scroll_y = y;
    }

    pub fn toggle_drawer(&mut self) {
        if self.drawer_open {
            self.close_drawer();
        } else {
            self.drawer_open = true;
            self.hidden = false;
        }
    }

    pub fn close_drawer(&mut self) {
        self.drawer_open = false;
        self.dropdown_open = false;
    }

    pub fn toggle_dropdown(&mut self) {
        self.dropdown_open = !self.dropdown_open;
    }

    /// Navigation closes the drawer and the dropdown.
    pub fn on_route_change(&mut self, path: impl Into<String>) {
        self.path = path.into();
        self.close_drawer();
    }

    pub fn on_key(&mut self, key: &str) {
        if key == "Escape" {
            self.close_drawer();
        }
    }

    /// Static links plus one dropdown entry per active service.
    pub fn links(&self, services: &[Service]) -> Vec<NavLink> {
        let path = self.path.as_str();
        let mut sorted: Vec<&Service> = services.iter().filter(|s| !s.slug.is_empty()).collect();
        sorted.sort_by_key(|s| s.display_order);

        let mut services_link = NavLink::new("Services", "/services", path);
        services_link.children = sorted
            .into_iter()
            .map(|s| NavLink::new(&s.title, &format!("/services/{}", s.slug), path))
            .collect();

        vec![
            NavLink::new("Home", "/", path),
            NavLink::new("About", "/about", path),
            services_link,
            NavLink::new("Blog", "/blog", path),
            NavLink::new("Contact", "/contact", path),
        ]
    }

    pub fn view(&self, services: &[Service]) -> NavbarView {
        NavbarView {
            links: self.links(services),
            scrolled: self.scrolled,
            hidden: self.hidden,
            drawer_open: self.drawer_open,
            dropdown_open: self.dropdown_open,
            body_scroll_locked: self.body_scroll_locked(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_on_downward_scroll_past_threshold() {
        let mut nav = NavbarState::default();
        nav.on_scroll(50);
        assert!(nav.is_scrolled());
        assert!(!nav.is_hidden());
        nav.on_scroll(150);
        assert!(nav.is_hidden());
        nav.on_scroll(140);
        assert!(!nav.is_hidden());
        nav.on_scroll(10);
        assert!(!nav.is_scrolled());
    }

    #[test]
    fn open_drawer_keeps_bar_visible_and_locks_body() {
        let mut nav = NavbarState::default();
        nav.toggle_drawer();
        assert!(nav.body_scroll_locked());
        nav.on_scroll(400);
        assert!(!nav.is_hidden());
        nav.on_key("Escape");
        assert!(!nav.drawer_open());
        assert!(!nav.body_scroll_locked());
    }

    #[test]
    fn route_change_closes_drawer() {
        let mut nav = NavbarState::default();
        nav.toggle_drawer();
        nav.toggle_dropdown();
        nav.on_route_change("/blog");
        let view = nav.view(&[]);
        assert!(!view.drawer_open);
        assert!(!view.dropdown_open);
        assert!(view.links.iter().find(|l| l.label == "Blog").is_some_and(|l| l.active));
        assert!(!view.links[0].active);
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut nav = NavbarState::default();
        nav.toggle_drawer();
        nav.on_key("Enter");
        assert!(nav.drawer_open());
    }

    #[test]
    fn dropdown_lists_services_by_display_order() {
        let services = vec![
            Service { title: "SEO".into(), slug: "seo".into(), display_order: 2, ..Default::default() },
            Service { title: "Web".into(), slug: "web".into(), display_order: 1, ..Default::default() },
        ];
        let nav = NavbarState::new("/services/seo");
        let links = nav.links(&services);
        let dropdown = &links[2];
        assert!(dropdown.active);
        let hrefs: Vec<&str> = dropdown.children.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/services/web", "/services/seo"]);
        assert!(dropdown.children[1].active);
    }

    #[test]
    fn prefix_alone_is_not_active() {
        assert!(!is_active("/blog", "/blogroll"));
        assert!(is_active("/blog", "/blog/hello"));
    }
}
