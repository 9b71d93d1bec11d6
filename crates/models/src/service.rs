use std::fmt;

use serde::{Deserialize, Serialize};

use crate::de;
use crate::icon::{self, ServiceIcon};

/// A marketing offering as the backend returns it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default, deserialize_with = "de::flexible_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "de::null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub short_description: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub full_description: String,
    #[serde(default, deserialize_with = "icon::lenient")]
    pub icon: Option<ServiceIcon>,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub featured: bool,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de::flexible_i64")]
    pub display_order: i64,
    #[serde(default, deserialize_with = "de::null_default")]
    pub meta_title: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub meta_description: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub meta_keywords: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub features: Vec<Feature>,
    /// List endpoints may send a count instead of the nested features.
    #[serde(default, deserialize_with = "de::flexible_opt_u32", skip_serializing_if = "Option::is_none")]
    pub features_count: Option<u32>,
}

impl Service {
    pub fn feature_count(&self) -> usize {
        match self.features_count {
            Some(n) if self.features.is_empty() => n as usize,
            _ => self.features.len(),
        }
    }
}

/// A sub-item of exactly one service. Order is carried by `display_order`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, deserialize_with = "de::flexible_opt_i64", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "icon::lenient")]
    pub icon: Option<ServiceIcon>,
    #[serde(default, deserialize_with = "de::flexible_i64")]
    pub display_order: i64,
}

/// Body of a create or full update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServicePayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub short_description: String,
    #[serde(default)]
    pub full_description: String,
    pub icon: ServiceIcon,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: u32,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub meta_keywords: String,
    #[serde(default)]
    pub features: Vec<FeaturePayload>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeaturePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<ServiceIcon>,
    pub display_order: u32,
}

/// What an update call sends: the whole record, or only the status flag.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServiceUpdate {
    Full(ServicePayload),
    Status { is_active: bool },
}

impl ServicePayload {
    /// The record the backend would hold after applying this payload.
    pub fn into_service(self, id: i64) -> Service {
        let slug = self.slug.unwrap_or_else(|| crate::slug::slugify(&self.title));
        Service {
            id,
            title: self.title,
            slug,
            short_description: self.short_description,
            full_description: self.full_description,
            icon: Some(self.icon),
            featured: self.featured,
            is_active: self.is_active,
            display_order: i64::from(self.display_order),
            meta_title: self.meta_title,
            meta_description: self.meta_description,
            meta_keywords: self.meta_keywords,
            features: self
                .features
                .into_iter()
                .map(|f| Feature {
                    id: f.id,
                    title: f.title,
                    description: f.description,
                    icon: f.icon,
                    display_order: i64::from(f.display_order),
                })
                .collect(),
            features_count: None,
        }
    }
}

/// Status filter of the admin table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Inactive => "inactive",
        }
    }

    pub fn matches(self, service: &Service) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => service.is_active,
            StatusFilter::Inactive => !service.is_active,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loose_backend_record_parses() {
        let s: Service = serde_json::from_value(json!({
            "id": "7",
            "title": "Web Development",
            "slug": "web-development",
            "short_description": null,
            "icon": "rocket",
            "is_active": 1,
            "display_order": "2",
            "features_count": 3
        }))
        .unwrap();
        assert_eq!(s.id, 7);
        assert_eq!(s.short_description, "");
        assert_eq!(s.icon, None);
        assert!(s.is_active);
        assert_eq!(s.display_order, 2);
        assert_eq!(s.feature_count(), 3);
    }

    #[test]
    fn status_update_serializes_flag_only() {
        let body = serde_json::to_value(ServiceUpdate::Status { is_active: false }).unwrap();
        assert_eq!(body, json!({"is_active": false}));
    }

    #[test]
    fn pending_feature_has_no_id_on_the_wire() {
        let f = FeaturePayload { id: None, title: "SEO".into(), description: String::new(), icon: None, display_order: 0 };
        let body = serde_json::to_value(f).unwrap();
        assert!(body.get("id").is_none());
    }
}
