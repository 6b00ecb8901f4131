//! Page-based pagination arithmetic.
//!
//! Pages are 1-based. A [`PageRequest`] can only be built from a valid page
//! and size, so offsets computed from it are never negative.

use serde::{Deserialize, Serialize};

/// Default page size when the client does not send one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Errors produced when validating pagination parameters.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PagingError {
    /// Page number below 1.
    #[error("page must be at least 1 (got {0})")]
    InvalidPage(i64),
    /// Page size outside `1..=MAX_PAGE_SIZE`.
    #[error("size must be between 1 and {MAX_PAGE_SIZE} (got {0})")]
    InvalidSize(i64),
}

/// A validated request for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    size: i64,
}

impl PageRequest {
    /// Validate a page number and page size.
    ///
    /// # Errors
    ///
    /// Returns [`PagingError`] if `page < 1` or `size` is outside `1..=MAX_PAGE_SIZE`.
    pub const fn new(page: i64, size: i64) -> Result<Self, PagingError> {
        if page < 1 {
            return Err(PagingError::InvalidPage(page));
        }
        if size < 1 || size > MAX_PAGE_SIZE {
            return Err(PagingError::InvalidSize(size));
        }
        Ok(Self { page, size })
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> i64 {
        self.page
    }

    /// The page size (`LIMIT`).
    #[must_use]
    pub const fn size(&self) -> i64 {
        self.size
    }

    /// Number of rows to skip (`OFFSET`).
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }

    /// Build the paging metadata for a result set with `total_item` matches.
    #[must_use]
    pub const fn paging(&self, total_item: i64) -> Paging {
        Paging {
            page: self.page,
            size: self.size,
            total_page: total_pages(total_item, self.size),
            total_item,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paging metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub page: i64,
    pub size: i64,
    pub total_page: i64,
    pub total_item: i64,
}

/// `ceil(total_item / size)`; zero when there are no items.
#[must_use]
pub const fn total_pages(total_item: i64, size: i64) -> i64 {
    if total_item <= 0 || size <= 0 {
        return 0;
    }
    (total_item + size - 1) / size
}
