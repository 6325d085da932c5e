//! Pagination request clamping and the page envelope.

use serde::{Deserialize, Serialize};

/// A clamped pagination request.
///
/// Out-of-range values are silently clamped, never rejected: the page
/// number is forced to at least 1 and the page size into `[1, 100]`.
/// Blank search queries, by contrast, are rejected outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: i64,
    page_size: i64,
}

impl PageRequest {
    /// Page size used when a request does not specify one.
    pub const DEFAULT_PAGE_SIZE: i64 = 10;
    /// Largest page a single request may ask for.
    pub const MAX_PAGE_SIZE: i64 = 100;

    /// Build a request, clamping both values into range.
    #[must_use]
    pub fn new(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number: page_number.max(1),
            page_size: page_size.clamp(1, Self::MAX_PAGE_SIZE),
        }
    }

    #[must_use]
    pub const fn page_number(&self) -> i64 {
        self.page_number
    }

    #[must_use]
    pub const fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Number of rows to skip for this page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page_number - 1) * self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the navigation envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page_number: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub total_records: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    /// Assemble the envelope for `data` at `request` out of `total_records`.
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total_records: i64) -> Self {
        // `i64::div_ceil` is still unstable (int_roundings); total_records is a
        // non-negative count and page_size is clamped to >= 1, so the standard
        // ceiling-division identity computes the identical value on stable.
        let total_pages = (total_records + request.page_size() - 1) / request.page_size();
        Self {
            data,
            page_number: request.page_number(),
            page_size: request.page_size(),
            total_pages,
            total_records,
            has_previous_page: request.page_number() > 1,
            has_next_page: request.page_number() < total_pages,
        }
    }
}
