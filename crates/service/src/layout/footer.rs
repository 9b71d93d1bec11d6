use configs::SiteConfig;
use models::Service;
use serde::Serialize;

pub const MAX_FOOTER_SERVICES: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FooterLink {
    pub title: String,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FooterView {
    pub company_name: String,
    pub services: Vec<FooterLink>,
    /// True when `services` came from the static list.
    pub fallback: bool,
    pub quick_links: Vec<FooterLink>,
    pub contact: ContactInfo,
    pub copyright: String,
}

impl FooterView {
    /// `services` is `None` when the fetch failed; an empty list falls back too.
    pub fn new(services: Option<&[Service]>, site: &SiteConfig, year: i32) -> Self {
        let fetched: Vec<FooterLink> = services
            .unwrap_or_default()
            .iter()
            .filter(|s| !s.slug.is_empty())
            .take(MAX_FOOTER_SERVICES)
            .map(|s| FooterLink { title: s.title.clone(), href: format!("/services/{}", s.slug) })
            .collect();
        let fallback = fetched.is_empty();
        let services = if fallback {
            site.fallback_services
                .iter()
                .take(MAX_FOOTER_SERVICES)
                .map(|s| FooterLink { title: s.title.clone(), href: format!("/services/{}", s.slug) })
                .collect()
        } else {
            fetched
        };

        let quick_links = [("Home", "/"), ("About", "/about"), ("Services", "/services"), ("Blog", "/blog"), ("Contact", "/contact")]
            .into_iter()
            .map(|(title, href)| FooterLink { title: title.to_string(), href: href.to_string() })
            .collect();

        Self {
            company_name: site.company_name.clone(),
            services,
            fallback,
            quick_links,
            contact: ContactInfo { email: site.email.clone(), phone: site.phone.clone(), address: site.address.clone() },
            copyright: format!("© {year} {}. All rights reserved.", site.company_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc(i: i64) -> Service {
        Service { id: i, title: format!("S{i}"), slug: format!("s-{i}"), ..Default::default() }
    }

    #[test]
    fn caps_fetched_services() {
        let services: Vec<Service> = (1..=9).map(svc).collect();
        let footer = FooterView::new(Some(services.as_slice()), &SiteConfig::default(), 2025);
        assert_eq!(footer.services.len(), MAX_FOOTER_SERVICES);
        assert!(!footer.fallback);
        assert_eq!(footer.services[0].href, "/services/s-1");
    }

    #[test]
    fn falls_back_on_error_or_empty() {
        let site = SiteConfig::default();
        let on_error = FooterView::new(None, &site, 2025);
        let on_empty = FooterView::new(Some(&[][..]), &site, 2025);
        assert!(on_error.fallback && on_empty.fallback);
        assert_eq!(on_error.services, on_empty.services);
        assert_eq!(on_error.services[0].title, site.fallback_services[0].title);
    }

    #[test]
    fn copyright_carries_year_and_company() {
        let site = SiteConfig { company_name: "Acme".into(), ..Default::default() };
        let footer = FooterView::new(None, &site, 2031);
        assert_eq!(footer.copyright, "© 2031 Acme. All rights reserved.");
    }
}
