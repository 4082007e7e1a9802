//! Page parameters and envelopes for list endpoints.

use serde::{Deserialize, Serialize};

/// Largest page size a client may request.
pub const MAX_PER_PAGE: u32 = 100;

const DEFAULT_PER_PAGE: u32 = 20;

/// `?page=&per_page=` query parameters, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: u32,
    /// Rows per page.
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Forces `page >= 1` and `per_page` into `1..=MAX_PER_PAGE`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * self.limit()
    }

    /// Rows to fetch.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// One page of results plus where it sits in the whole list.
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse<T> {
    /// Rows on this page.
    pub data: Vec<T>,
    /// Position of this page.
    pub meta: PageMeta,
}

/// Position of a page within the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// Page number.
    pub page: u32,
    /// Rows per page.
    pub per_page: u32,
    /// Rows across all pages.
    pub total: u64,
    /// Page count, at least 1 so an empty list still has a first page.
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    /// Wraps `data` fetched for `request` out of `total` rows.
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(request.limit().max(1)).max(1);
        Self {
            data,
            meta: PageMeta {
                page: request.page,
                per_page: request.per_page,
                total,
                total_pages,
            },
        }
    }
}
