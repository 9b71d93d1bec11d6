//! Sidebar widgets: popular posts, recent posts, tag cloud.

use std::cmp::Reverse;
use std::collections::HashMap;

use models::Post;
use serde::Serialize;

use super::card::DATE_FORMAT;

pub const POPULAR_MIN_VIEWS: u64 = 50;
pub const WIDGET_SIZE: usize = 5;
pub const TAG_CLOUD_SIZE: usize = 15;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SidebarPost {
    pub title: String,
    pub url: String,
    pub view_count: u64,
    pub date: Option<String>,
}

impl SidebarPost {
    fn new(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            url: format!("/blog/{}", post.slug),
            view_count: post.view_count,
            date: post.created_at.map(|d| d.format(DATE_FORMAT).to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sidebar {
    pub popular: Vec<SidebarPost>,
    pub recent: Vec<SidebarPost>,
    pub tags: Vec<TagCount>,
}

impl Sidebar {
    pub fn new(posts: &[Post]) -> Self {
        Self {
            popular: popular(posts).into_iter().map(SidebarPost::new).collect(),
            recent: recent(posts).into_iter().map(SidebarPost::new).collect(),
            tags: tag_cloud(posts),
        }
    }
}

/// More than 50 views, most viewed first.
pub fn popular(posts: &[Post]) -> Vec<&Post> {
    let mut hot: Vec<&Post> = posts.iter().filter(|p| p.view_count > POPULAR_MIN_VIEWS).collect();
    hot.sort_by_key(|p| Reverse(p.view_count));
    hot.truncate(WIDGET_SIZE);
    hot
}

/// Newest first; undated posts go last.
pub fn recent(posts: &[Post]) -> Vec<&Post> {
    let mut all: Vec<&Post> = posts.iter().collect();
    all.sort_by_key(|p| Reverse(p.created_at));
    all.truncate(WIDGET_SIZE);
    all
}

/// Distinct tags by frequency, ties by name. Tags compare case-insensitively,
/// the first spelling seen is shown.
pub fn tag_cloud(posts: &[Post]) -> Vec<TagCount> {
    let mut counts: HashMap<String, TagCount> = HashMap::new();
    for tag in posts.iter().flat_map(|p| p.tags.iter()) {
        counts
            .entry(tag.to_lowercase())
            .or_insert_with(|| TagCount { tag: tag.clone(), count: 0 })
            .count += 1;
    }
    let mut cloud: Vec<TagCount> = counts.into_values().collect();
    cloud.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.to_lowercase().cmp(&b.tag.to_lowercase())));
    cloud.truncate(TAG_CLOUD_SIZE);
    cloud
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use models::Tags;

    fn post(id: i64, views: u64, days_ago: Option<i64>, tags: &[&str]) -> Post {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        Post {
            id,
            title: format!("Post {id}"),
            slug: format!("post-{id}"),
            view_count: views,
            created_at: days_ago.map(|d| base - Duration::days(d)),
            tags: Tags::new(tags.iter().copied()),
            ..Default::default()
        }
    }

    #[test]
    fn popular_needs_more_than_fifty_views() {
        let posts: Vec<Post> = (1..=8).map(|i| post(i, i as u64 * 20, Some(i), &[])).collect();
        let ids: Vec<i64> = popular(&posts).iter().map(|p| p.id).collect();
        // 60, 80, ... 160 qualify; 50 does not
        assert_eq!(ids, vec![8, 7, 6, 5, 4]);
        let few = vec![post(1, 50, None, &[])];
        assert!(popular(&few).is_empty());
    }

    #[test]
    fn recent_puts_undated_last() {
        let posts = vec![post(1, 0, None, &[]), post(2, 0, Some(5), &[]), post(3, 0, Some(1), &[])];
        let ids: Vec<i64> = recent(&posts).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn tag_cloud_orders_by_frequency_then_name() {
        let posts = vec![
            post(1, 0, None, &["rust", "web"]),
            post(2, 0, None, &["Rust", "api"]),
            post(3, 0, None, &["web", "css"]),
        ];
        let cloud = tag_cloud(&posts);
        let tags: Vec<(&str, usize)> = cloud.iter().map(|t| (t.tag.as_str(), t.count)).collect();
        assert_eq!(tags, vec![("rust", 2), ("web", 2), ("api", 1), ("css", 1)]);
    }

    #[test]
    fn tag_cloud_is_capped() {
        let names: Vec<String> = (0..20).map(|i| format!("t{i:02}")).collect();
        let posts = vec![Post { tags: Tags::new(names), ..Default::default() }];
        assert_eq!(tag_cloud(&posts).len(), TAG_CLOUD_SIZE);
    }
}
