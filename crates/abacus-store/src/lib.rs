//! # Abacus Store
//!
//! Shared storage for computed results.
//!
//! The store owns a newest-first sequence of [`Record`]s behind a single
//! reader/writer lock. Writers prepend; readers take a normalized
//! [`Pagination`] and get back a contiguous slice plus [`PageMetadata`].
//!
//! Two implementations are provided:
//!
//! - [`MemoryStore`] keeps everything in memory.
//! - [`JsonStore`] wraps a `MemoryStore` and adds [`load`](JsonStore::load)
//!   and [`save`](JsonStore::save) against a JSON snapshot on disk. Neither
//!   is called per request.
//!
//! ## Example
//!
//! ```
//! use abacus_store::{MemoryStore, Pagination, Record, ResultSink, ResultSource};
//! use chrono::Utc;
//!
//! let store = MemoryStore::new();
//! store.insert(Record::new(3.8, "1.50 + 2.30 = 3.80", Utc::now()));
//! store.insert(Record::new(2.5, "5.00 / 2.00 = 2.50", Utc::now()));
//!
//! let page = store.query(Pagination::new(1, 1));
//! assert_eq!(page.items[0].expression(), "5.00 / 2.00 = 2.50");
//! assert_eq!(page.metadata.total_records, 2);
//! assert_eq!(page.metadata.last_page, 2);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod json;
mod memory;
mod pagination;
mod record;

pub use error::{StoreError, StoreResult};
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use pagination::{
    Page, PageMetadata, Pagination, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE,
};
pub use record::Record;

/// Accepts new records.
pub trait ResultSink: Send + Sync {
    /// Prepends a record. Never fails.
    fn insert(&self, record: Record);
}

/// Serves paginated reads.
pub trait ResultSource: Send + Sync {
    /// Returns one page of records, newest first.
    ///
    /// `pagination` is normalized before use. A page past the end is empty,
    /// never an error.
    fn query(&self, pagination: Pagination) -> Page<Record>;
}

/// A store that can both accept and serve records.
pub trait ResultStore: ResultSink + ResultSource {}

impl<T: ResultSink + ResultSource + ?Sized> ResultStore for T {}
