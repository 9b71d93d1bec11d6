//! Tag normalisation at the ingestion boundary.
//!
//! Posts carry tags as a JSON array, a JSON-encoded array inside a string, or
//! a comma-delimited string. [`Tags`] accepts all three and always holds a
//! plain list, so nothing downstream re-parses.

use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tags(Vec<String>);

impl Tags {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            tags.into_iter()
                .map(|t| {
                    let t: String = t.into();
                    t.trim().to_string()
                })
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    /// Case-insensitive containment on any tag.
    pub fn any_contains(&self, needle_lower: &str) -> bool {
        self.0.iter().any(|t| t.to_lowercase().contains(needle_lower))
    }
}

impl Deref for Tags {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn value_to_tag(v: Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Normalise a raw string: JSON array when it parses as one, comma split otherwise.
pub fn normalize_str(raw: &str) -> Tags {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<Value>>(trimmed) {
            return Tags::new(items.into_iter().filter_map(value_to_tag));
        }
    }
    Tags::new(trimmed.split(','))
}

pub fn normalize_value(value: Value) -> Tags {
    match value {
        Value::Array(items) => Tags::new(items.into_iter().filter_map(value_to_tag)),
        Value::String(s) => normalize_str(&s),
        _ => Tags::default(),
    }
}

impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Value>::deserialize(d)?.map(normalize_value).unwrap_or_default())
    }
}

impl From<Vec<String>> for Tags {
    fn from(v: Vec<String>) -> Self {
        Tags::new(v)
    }
}
