//! Pagination primitives shared by every list operation.

use serde::{Deserialize, Serialize};

/// A normalised, 1-based page request.
///
/// Construction never fails: non-positive values fall back to the defaults
/// (`page = 1`, `page_size = 10`), so `PageRequest::new(0, 0)` and
/// `PageRequest::new(1, 10)` are the same request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: normalise(page, Self::DEFAULT_PAGE),
            page_size: normalise(page_size, Self::DEFAULT_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// Maximum number of rows to return.
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

fn normalise(value: i64, default: u32) -> u32 {
    if value <= 0 {
        default
    } else {
        u32::try_from(value).unwrap_or(u32::MAX)
    }
}

/// One page of results plus the total number of matches (ignoring pagination).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self { items, total, request }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn non_positive_values_fall_back_to_defaults() {
        assert_eq!(PageRequest::new(0, 0), PageRequest::new(1, 10));
        assert_eq!(PageRequest::new(-3, -1), PageRequest::default());
    }

    #[test]
    fn offset_is_zero_based() {
        let req = PageRequest::new(3, 25);
        assert_eq!(req.offset(), 50);
        assert_eq!(req.limit(), 25);
        assert_eq!(PageRequest::default().offset(), 0);
    }

    #[test]
    fn oversized_page_numbers_saturate_instead_of_wrapping() {
        let req = PageRequest::new(i64::MAX, i64::MAX);
        assert_eq!(req.page(), u32::MAX);
        assert_eq!(req.offset(), u64::from(u32::MAX - 1) * u64::from(u32::MAX));
    }

    proptest! {
        #[test]
        fn normalised_request_is_always_positive(page in any::<i64>(), size in any::<i64>()) {
            let req = PageRequest::new(page, size);
            prop_assert!(req.page() >= 1);
            prop_assert!(req.page_size() >= 1);
        }
    }
}
