use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::de;
use crate::tags::Tags;

/// A blog article. Tags are already normalised when this exists.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, deserialize_with = "de::flexible_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "de::null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub excerpt: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub content: String,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default, deserialize_with = "de::null_default")]
    pub category: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub author: String,
    #[serde(default, deserialize_with = "de::lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::flexible_u64")]
    pub view_count: u64,
    #[serde(default, deserialize_with = "de::flexible_opt_u32")]
    pub reading_time: Option<u32>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub featured_image: Option<String>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(alias = "name")]
    pub category: String,
    #[serde(default, deserialize_with = "de::flexible_u64")]
    pub count: u64,
}

/// `meta.category_counts` arrives either as a list or as an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategoryCounts {
    List(Vec<CategoryCount>),
    Map(BTreeMap<String, u64>),
}

impl From<RawCategoryCounts> for Vec<CategoryCount> {
    fn from(raw: RawCategoryCounts) -> Self {
        match raw {
            RawCategoryCounts::List(list) => list,
            RawCategoryCounts::Map(map) => {
                map.into_iter().map(|(category, count)| CategoryCount { category, count }).collect()
            }
        }
    }
}

#[derive(Deserialize)]
struct RawBlogMeta {
    #[serde(default)]
    category_counts: Option<RawCategoryCounts>,
}

#[derive(Deserialize)]
struct RawPostList {
    #[serde(default, deserialize_with = "de::null_default")]
    data: Vec<Post>,
    #[serde(default)]
    meta: Option<RawBlogMeta>,
}

/// Everything the blog listing fetches in one call.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "RawPostList")]
pub struct PostFeed {
    pub posts: Vec<Post>,
    /// Empty when the backend sent no aggregate.
    pub category_counts: Vec<CategoryCount>,
}

impl From<RawPostList> for PostFeed {
    fn from(raw: RawPostList) -> Self {
        let category_counts = raw
            .meta
            .and_then(|m| m.category_counts)
            .map(Vec::from)
            .unwrap_or_default();
        Self { posts: raw.data, category_counts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feed_reads_list_counts() {
        let feed: PostFeed = serde_json::from_value(json!({
            "data": [{"id": 1, "title": "Hello", "tags": "a,b"}],
            "meta": {"category_counts": [{"category": "news", "count": 2}]}
        }))
        .unwrap();
        assert_eq!(feed.posts.len(), 1);
        assert_eq!(&*feed.posts[0].tags, &["a".to_string(), "b".to_string()]);
        assert_eq!(feed.category_counts, vec![CategoryCount { category: "news".into(), count: 2 }]);
    }

    #[test]
    fn feed_reads_object_counts() {
        let feed: PostFeed = serde_json::from_value(json!({
            "data": [],
            "meta": {"category_counts": {"tips": 4, "news": 1}}
        }))
        .unwrap();
        assert_eq!(feed.category_counts.len(), 2);
        assert_eq!(feed.category_counts[0].category, "news");
    }

    #[test]
    fn feed_without_meta_has_no_counts() {
        let feed: PostFeed = serde_json::from_value(json!({"data": null})).unwrap();
        assert!(feed.posts.is_empty());
        assert!(feed.category_counts.is_empty());
    }
}
