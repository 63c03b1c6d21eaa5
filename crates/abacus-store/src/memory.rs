use crate::pagination::{Page, Pagination};
use crate::record::Record;
use crate::{ResultSink, ResultSource};
use parking_lot::RwLock;
use std::collections::VecDeque;

/// In-memory result store.
///
/// Records live in a `VecDeque`, newest at the front, behind one
/// `RwLock`. Inserts take the write lock; queries take the read lock once
/// and compute the length, the offset check and the slice under it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub(crate) records: RwLock<VecDeque<Record>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `records`, given newest first.
    #[must_use]
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records: RwLock::new(VecDeque::from(records)),
        }
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns `true` if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Clones every record, newest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Record> {
        self.records.read().iter().cloned().collect()
    }
}

impl ResultSink for MemoryStore {
    fn insert(&self, record: Record) {
        self.records.write().push_front(record);
    }
}

impl ResultSource for MemoryStore {
    fn query(&self, pagination: Pagination) -> Page<Record> {
        let pagination = pagination.normalize();
        let records = self.records.read();
        let total = records.len();

        let items = if pagination.offset() >= total {
            Vec::new()
        } else {
            records
                .range(pagination.offset()..)
                .take(pagination.limit())
                .cloned()
                .collect()
        };

        Page {
            items,
            metadata: pagination.metadata(total),
        }
    }
}
