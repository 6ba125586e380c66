//! Pagination types shared by list queries

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest row offset a query may use (Postgres `OFFSET` is a signed bigint)
const MAX_OFFSET: u64 = i64::MAX as u64;

/// A 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Build a request from raw query values, clamping into range
    pub fn new(page: Option<u64>, page_size: Option<u64>, max_page_size: u64) -> Self {
        let page_size = page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, max_page_size.max(1));
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_OFFSET / page_size + 1),
            page_size,
        }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// Number of pages needed to hold `total` rows
    pub fn pages(&self, total: u64) -> u64 {
        total.div_ceil(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the total matching count
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Paged<T> {
    /// Slice an already filtered and ordered list
    #[cfg(test)]
    pub fn from_vec(all: Vec<T>, page: &PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Self { items, total }
    }
}

/// Pagination block returned alongside list responses
#[derive(Debug, Clone, Serialize)]
pub struct PaginationInfo {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub pages: u64,
}

impl PaginationInfo {
    pub fn new(page: &PageRequest, total: u64) -> Self {
        Self {
            page: page.page,
            page_size: page.page_size,
            total,
            pages: page.pages(total),
        }
    }
}
