use std::collections::BTreeMap;
use std::sync::Arc;

use models::{CategoryCount, Post, PostFeed};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::card::PostCard;
use super::sidebar::Sidebar;
use crate::api::BlogFilters;
use crate::context::SiteContext;
use crate::errors::ServiceError;
use crate::query_cache::QueryKey;

/// Pseudo-category matching every post.
pub const ALL_CATEGORY: &str = "all";

/// Published posts, fetched at most once per cache lifetime.
#[instrument(skip(ctx))]
pub async fn fetch_feed(ctx: &SiteContext) -> Result<Arc<PostFeed>, ServiceError> {
    let filters = BlogFilters::published();
    let api = ctx.blog.clone();
    ctx.cache
        .get_or_fetch(QueryKey::Posts { status: filters.status.clone() }, || async move {
            api.list_posts(&filters).await
        })
        .await
}

/// Query string of the listing page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct BlogQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub id: String,
    pub label: String,
    pub count: u64,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultSummary {
    pub count: usize,
    pub category: String,
    pub search: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BlogListingView {
    pub categories: Vec<CategoryOption>,
    pub posts: Vec<PostCard>,
    pub summary: ResultSummary,
    pub sidebar: Sidebar,
}

/// Filter state of the listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlogListing {
    category: String,
    search: String,
}

impl Default for BlogListing {
    fn default() -> Self {
        Self { category: ALL_CATEGORY.to_string(), search: String::new() }
    }
}

impl BlogListing {
    pub fn new(query: BlogQuery) -> Self {
        let mut listing = Self::default();
        if let Some(c) = query.category {
            listing.set_category(c);
        }
        if let Some(s) = query.search {
            listing.set_search(s);
        }
        listing
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Blank selects "all".
    pub fn set_category(&mut self, category: impl Into<String>) {
        let c = category.into().trim().to_string();
        self.category = if c.is_empty() { ALL_CATEGORY.to_string() } else { c };
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into().trim().to_string();
    }

    /// Category match, then case-insensitive substring over title, excerpt,
    /// content and tags.
    pub fn matches(&self, post: &Post) -> bool {
        let in_category =
            self.category.eq_ignore_ascii_case(ALL_CATEGORY) || post.category.eq_ignore_ascii_case(&self.category);
        if !in_category {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        [&post.title, &post.excerpt, &post.content]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
            || post.tags.any_contains(&needle)
    }

    pub fn filter<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        posts.iter().filter(|p| self.matches(p)).collect()
    }

    /// Render against an already fetched feed. The sidebar always reflects the
    /// whole feed, not the filtered subset.
    pub fn view(&self, feed: &PostFeed) -> BlogListingView {
        let posts: Vec<PostCard> = self.filter(&feed.posts).into_iter().map(PostCard::new).collect();
        debug!(event = "blog_filtered", total = feed.posts.len(), shown = posts.len(), category = %self.category);
        BlogListingView {
            categories: category_options(feed, &self.category),
            summary: ResultSummary {
                count: posts.len(),
                category: self.category.clone(),
                search: self.search.clone(),
            },
            posts,
            sidebar: Sidebar::new(&feed.posts),
        }
    }

    pub async fn load(&self, ctx: &SiteContext) -> Result<BlogListingView, ServiceError> {
        let feed = fetch_feed(ctx).await?;
        Ok(self.view(&feed))
    }
}

/// Server aggregate counts (or counts derived from the posts when the backend
/// sent none), led by "All Posts".
pub fn category_options(feed: &PostFeed, active: &str) -> Vec<CategoryOption> {
    let counts = if feed.category_counts.is_empty() {
        derive_counts(&feed.posts)
    } else {
        feed.category_counts.clone()
    };

    let mut options = vec![CategoryOption {
        id: ALL_CATEGORY.to_string(),
        label: "All Posts".to_string(),
        count: feed.posts.len() as u64,
        active: active.eq_ignore_ascii_case(ALL_CATEGORY),
    }];
    options.extend(counts.into_iter().filter(|c| !c.category.trim().is_empty()).map(|c| CategoryOption {
        label: humanize(&c.category),
        active: c.category.eq_ignore_ascii_case(active),
        id: c.category,
        count: c.count,
    }));
    options
}

fn derive_counts(posts: &[Post]) -> Vec<CategoryCount> {
    let mut map: BTreeMap<&str, u64> = BTreeMap::new();
    for p in posts.iter().filter(|p| !p.category.trim().is_empty()) {
        *map.entry(p.category.as_str()).or_default() += 1;
    }
    let mut counts: Vec<CategoryCount> =
        map.into_iter().map(|(category, count)| CategoryCount { category: category.to_string(), count }).collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// "web-design" / "web_design" -> "Web Design"
fn humanize(category: &str) -> String {
    category
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
