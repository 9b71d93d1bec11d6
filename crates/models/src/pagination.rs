use serde::{Deserialize, Serialize};

use crate::de;

/// Paging block of a list response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default, deserialize_with = "de::flexible_u64")]
    pub page: u64,
    #[serde(default, deserialize_with = "de::flexible_u64")]
    pub limit: u64,
    #[serde(default, deserialize_with = "de::flexible_u64")]
    pub total: u64,
    #[serde(default, deserialize_with = "de::flexible_u64", alias = "total_pages")]
    pub pages: u64,
}

impl PageMeta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self { page, limit, total, pages }
    }
}

/// `{data, pagination}` envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default, alias = "meta")]
    pub pagination: PageMeta,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self { data: Vec::new(), pagination: PageMeta::default() }
    }
}

impl<T> Paginated<T> {
    /// Fill in paging fields the backend left out.
    pub fn normalized(mut self, requested_page: u64, requested_limit: u64) -> Self {
        let p = &mut self.pagination;
        if p.page == 0 { p.page = requested_page.max(1); }
        if p.limit == 0 { p.limit = requested_limit.max(1); }
        if p.total == 0 { p.total = (self.data.len() as u64).saturating_add((p.page - 1).saturating_mul(p.limit)); }
        if p.pages == 0 { p.pages = p.total.div_ceil(p.limit); }
        self
    }
}
