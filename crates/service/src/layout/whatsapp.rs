use configs::SiteConfig;
use reqwest::Url;
use serde::Serialize;
use tracing::warn;

/// Distance from the viewport bottom, in px.
pub const BASE_OFFSET: u32 = 24;
/// Extra lift while the scroll-to-top button sits underneath.
pub const SCROLL_TOP_OFFSET: u32 = 64;

/// Floating contact buttons.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WhatsAppFloat {
    pub whatsapp_url: Option<String>,
    pub phone_url: Option<String>,
    pub bottom_offset: u32,
}

impl WhatsAppFloat {
    pub fn new(site: &SiteConfig, scroll_to_top_visible: bool) -> Self {
        Self {
            whatsapp_url: whatsapp_url(&site.whatsapp_number, &site.whatsapp_message),
            phone_url: phone_url(&site.phone),
            bottom_offset: BASE_OFFSET + if scroll_to_top_visible { SCROLL_TOP_OFFSET } else { 0 },
        }
    }
}

pub fn whatsapp_url(number: &str, message: &str) -> Option<String> {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let base = format!("https://wa.me/{digits}");
    let parsed = if message.trim().is_empty() {
        Url::parse(&base)
    } else {
        Url::parse_with_params(&base, &[("text", message)])
    };
    match parsed {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            warn!(event = "whatsapp_url_invalid", error = %e);
            None
        }
    }
}

pub fn phone_url(phone: &str) -> Option<String> {
    let compact: String = phone.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();
    (!compact.is_empty()).then(|| format!("tel:{compact}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_are_encoded() {
        let url = whatsapp_url("+1 (555) 010-2030", "Hi there").unwrap();
        assert_eq!(url, "https://wa.me/15550102030?text=Hi+there");
        assert_eq!(phone_url("+1 555 010").as_deref(), Some("tel:+1555010"));
    }

    #[test]
    fn missing_numbers_hide_buttons() {
        assert!(whatsapp_url("", "hi").is_none());
        assert!(phone_url(" ").is_none());
    }

    #[test]
    fn offset_clears_scroll_to_top() {
        let site = SiteConfig::default();
        assert_eq!(WhatsAppFloat::new(&site, false).bottom_offset, BASE_OFFSET);
        assert_eq!(WhatsAppFloat::new(&site, true).bottom_offset, BASE_OFFSET + SCROLL_TOP_OFFSET);
    }
}
