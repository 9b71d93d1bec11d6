//! Filters of the admin service table.
//!
//! `ServiceFilters` doubles as the query-cache key of a table page, so it is
//! normalised before use: two requests for the same page compare equal.

use models::StatusFilter;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceFilters {
    /// 1-based page index
    #[serde(default = "default_page")]
    pub page: u32,
    /// items per page
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: StatusFilter,
}

fn default_page() -> u32 { 1 }
fn default_limit() -> u32 { DEFAULT_LIMIT }

impl ServiceFilters {
    /// Clamp to sane values and trim the search term.
    pub fn normalize(mut self) -> Self {
        if self.page == 0 { self.page = 1; }
        self.limit = self.limit.clamp(1, MAX_LIMIT);
        self.search = self.search.trim().to_string();
        self
    }

    /// New search term; goes back to the first page.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self.page = 1;
        self.normalize()
    }

    /// New status filter; goes back to the first page.
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self.page = 1;
        self.normalize()
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self.normalize()
    }

    /// Query string pairs for the backend; empty search and `all` are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if self.status != StatusFilter::All {
            pairs.push(("status", self.status.to_string()));
        }
        pairs
    }

    /// 0-based offset of the first row.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for ServiceFilters {
    fn default() -> Self {
        Self { page: 1, limit: DEFAULT_LIMIT, search: String::new(), status: StatusFilter::All }
    }
}
