//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Upper bound for `per_page`.
pub const MAX_PER_PAGE: u32 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Items per page clamped to `1..=MAX_PER_PAGE`.
    #[must_use]
    pub fn per_page(&self) -> u32 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }

    /// Page number, never below 1.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page())
    }

    /// Zero-based page index, as `Paginator::fetch_page` expects.
    #[must_use]
    pub fn index(&self) -> u64 {
        u64::from(self.page() - 1)
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Whether a later page exists.
    pub has_more: bool,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, request: &PageRequest, total: u64) -> Self {
        let per_page = request.per_page();
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(u64::from(per_page))
        };

        let page = request.page();
        Self {
            data,
            meta: PageMeta {
                page,
                per_page,
                total,
                total_pages,
                has_more: u64::from(page) < total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_default() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 20);
    }

    #[test]
    fn test_page_zero_reads_as_first_page() {
        let request = PageRequest { page: 0, per_page: 20 };
        assert_eq!(request.page(), 1);
        assert_eq!(request.index(), 0);
    }

    #[test]
    fn test_page_request_clamps_limit() {
        let request = PageRequest { page: 1, per_page: 5000 };
        assert_eq!(request.limit(), u64::from(MAX_PER_PAGE));

        let request = PageRequest { page: 1, per_page: 0 };
        assert_eq!(request.limit(), 1);
    }

    #[test]
    fn test_page_response_pagination() {
        let request = PageRequest { page: 1, per_page: 10 };
        let response: PageResponse<i32> = PageResponse::new(vec![], &request, 25);
        assert_eq!(response.meta.total_pages, 3);
        assert!(response.meta.has_more);

        let last = PageRequest { page: 3, per_page: 10 };
        assert!(!PageResponse::<i32>::new(vec![], &last, 25).meta.has_more);
    }

    #[test]
    fn test_page_response_empty() {
        let response: PageResponse<i32> = PageResponse::new(vec![], &PageRequest::default(), 0);
        assert_eq!(response.meta.total_pages, 1);
        assert!(!response.meta.has_more);
    }
}
