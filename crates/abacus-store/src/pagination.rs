//! Pagination policy.
//!
//! Pure functions over `(page, page_size)`. Inputs are signed so that raw
//! query values such as `page=-3` can be normalized instead of rejected.

use serde::{Deserialize, Serialize};

/// Page size used when the caller asks for less than [`MIN_PAGE_SIZE`].
pub const DEFAULT_PAGE_SIZE: i64 = 5;
/// Smallest accepted page size.
pub const MIN_PAGE_SIZE: i64 = 1;
/// Largest accepted page size; bigger requests are clamped.
pub const MAX_PAGE_SIZE: i64 = 20;

/// A requested page.
///
/// # Example
///
/// ```
/// use abacus_store::Pagination;
///
/// let p = Pagination::new(0, 100).normalize();
/// assert_eq!((p.page(), p.page_size()), (1, 20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    page: i64,
    page_size: i64,
}

impl Pagination {
    /// Creates a pagination request from raw values.
    #[must_use]
    pub const fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// The requested page, 1-based once normalized.
    #[must_use]
    pub const fn page(&self) -> i64 {
        self.page
    }

    /// The requested page size.
    #[must_use]
    pub const fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Clamps the request into range.
    ///
    /// `page` is raised to 1; a `page_size` below the minimum falls back to
    /// the default and one above the maximum is clamped. Idempotent.
    #[must_use]
    pub fn normalize(self) -> Self {
        let page = self.page.max(1);
        let page_size = if self.page_size < MIN_PAGE_SIZE {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size.min(MAX_PAGE_SIZE)
        };
        Self { page, page_size }
    }

    /// Index of the first record on this page.
    ///
    /// Saturates instead of overflowing for absurd page numbers.
    #[must_use]
    pub fn offset(&self) -> usize {
        let p = self.normalize();
        let offset = (p.page - 1).saturating_mul(p.page_size);
        usize::try_from(offset).unwrap_or(usize::MAX)
    }

    /// Maximum number of records on this page.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.normalize().page_size as usize
    }

    /// Derives the metadata for a store holding `total` records.
    ///
    /// `last_page` is `ceil(total / page_size)` with a floor of 1, so a
    /// partial trailing page is counted.
    #[must_use]
    pub fn metadata(&self, total: usize) -> PageMetadata {
        let p = self.normalize();
        let page = p.page as u64;
        let page_size = p.page_size as u64;
        let total_records = total as u64;

        let last_page = total_records.div_ceil(page_size).max(1);
        let next_page = page.saturating_add(1).min(last_page);

        PageMetadata {
            current_page: page,
            page_size,
            total_records,
            last_page,
            first_page: 1,
            next_page,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// Metadata returned alongside every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// The page that was served.
    pub current_page: u64,
    /// The effective page size.
    pub page_size: u64,
    /// Number of records in the store at read time.
    pub total_records: u64,
    /// Last page that holds records, at least 1.
    pub last_page: u64,
    /// Always 1.
    pub first_page: u64,
    /// `current_page + 1`, capped at `last_page`.
    pub next_page: u64,
}

/// One page of items plus its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page, in store order.
    pub items: Vec<T>,
    /// Pagination metadata.
    pub metadata: PageMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_defaults() {
        assert_eq!(Pagination::new(0, 0).normalize(), Pagination::new(1, 5));
        assert_eq!(Pagination::new(-7, -1).normalize(), Pagination::new(1, 5));
        assert_eq!(Pagination::new(3, 21).normalize(), Pagination::new(3, 20));
        assert_eq!(Pagination::new(2, 1).normalize(), Pagination::new(2, 1));
    }

    #[test]
    fn test_offset_and_limit() {
        let p = Pagination::new(3, 4);
        assert_eq!(p.offset(), 8);
        assert_eq!(p.limit(), 4);
        assert_eq!(Pagination::new(i64::MAX, 20).offset(), usize::MAX.min(i64::MAX as usize));
    }

    #[test]
    fn test_empty_store_metadata() {
        let meta = Pagination::default().metadata(0);
        assert_eq!(meta.current_page, 1);
        assert_eq!(meta.page_size, 5);
        assert_eq!(meta.total_records, 0);
        assert_eq!(meta.last_page, 1);
        assert_eq!(meta.next_page, 1);
        assert_eq!(meta.first_page, 1);
    }

    #[test]
    fn test_partial_last_page_is_counted() {
        let meta = Pagination::new(1, 5).metadata(6);
        assert_eq!(meta.last_page, 2);
        assert_eq!(meta.next_page, 2);

        let meta = Pagination::new(1, 2).metadata(3);
        assert_eq!(meta.last_page, 2);
        assert_eq!(meta.next_page, 2);

        let meta = Pagination::new(2, 5).metadata(10);
        assert_eq!(meta.last_page, 2);
        assert_eq!(meta.next_page, 2);
    }

    #[test]
    fn test_metadata_uses_normalized_page_size() {
        let meta = Pagination::new(1, 500).metadata(100);
        assert_eq!(meta.page_size, 20);
        assert_eq!(meta.last_page, 5);
    }

    #[test]
    fn test_metadata_serialization() {
        let json = serde_json::to_value(Pagination::new(1, 2).metadata(3)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "current_page": 1,
                "page_size": 2,
                "total_records": 3,
                "last_page": 2,
                "first_page": 1,
                "next_page": 2,
            })
        );
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(page in any::<i64>(), page_size in any::<i64>()) {
            let once = Pagination::new(page, page_size).normalize();
            prop_assert_eq!(once.normalize(), once);
        }

        #[test]
        fn prop_normalized_values_in_range(page in any::<i64>(), page_size in any::<i64>()) {
            let p = Pagination::new(page, page_size).normalize();
            prop_assert!(p.page() >= 1);
            prop_assert!((MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&p.page_size()));
        }

        #[test]
        fn prop_next_page_never_exceeds_last_page(
            page in -10_i64..10_000,
            page_size in -5_i64..50,
            total in 0_usize..100_000,
        ) {
            let meta = Pagination::new(page, page_size).metadata(total);
            prop_assert!(meta.last_page >= 1);
            prop_assert!(meta.next_page <= meta.last_page);
            prop_assert_eq!(meta.first_page, 1);
        }

        #[test]
        fn prop_last_page_covers_every_record(page_size in 1_i64..=20, total in 0_usize..10_000) {
            let meta = Pagination::new(1, page_size).metadata(total);
            let capacity = meta.last_page * meta.page_size;
            prop_assert!(capacity >= total as u64);
            prop_assert!(total == 0 || (meta.last_page - 1) * meta.page_size < total as u64);
        }
    }
}
