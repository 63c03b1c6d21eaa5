use crate::error::{StoreError, StoreResult};
use crate::memory::MemoryStore;
use crate::pagination::{Page, Pagination};
use crate::record::Record;
use crate::{ResultSink, ResultSource};
use std::collections::VecDeque;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A [`MemoryStore`] backed by a JSON snapshot file.
///
/// The snapshot is a JSON array of records, newest first. `load` and `save`
/// hold the store's lock for their whole duration, so a snapshot never
/// observes a half-applied insert and no insert lands mid-load.
#[derive(Debug)]
pub struct JsonStore {
    inner: MemoryStore,
    path: PathBuf,
}

impl JsonStore {
    /// Creates an empty store that will persist to `path`.
    ///
    /// Nothing is read until [`load`](Self::load) is called.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: MemoryStore::new(),
            path: path.into(),
        }
    }

    /// Creates a store and loads the snapshot at `path`.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    /// The snapshot path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The wrapped in-memory store.
    #[must_use]
    pub fn memory(&self) -> &MemoryStore {
        &self.inner
    }

    /// Replaces the in-memory records with the snapshot on disk.
    ///
    /// A missing or empty file leaves the store as it is; a file holding
    /// `null` empties it. Returns the number of records now held.
    pub fn load(&self) -> StoreResult<usize> {
        let mut records = self.inner.records.write();

        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no store snapshot, starting empty");
                return Ok(records.len());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(records.len());
        }

        // A `null` snapshot is an empty history.
        let loaded: Option<Vec<Record>> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        *records = VecDeque::from(loaded.unwrap_or_default());
        tracing::info!(path = %self.path.display(), records = records.len(), "store snapshot loaded");
        Ok(records.len())
    }

    /// Writes the current records to disk.
    ///
    /// The snapshot goes to `<path>.tmp` first and is then renamed over
    /// `<path>`. Returns the number of records written.
    pub fn save(&self) -> StoreResult<usize> {
        let records = self.inner.records.read();

        let bytes = serde_json::to_vec(&*records).map_err(StoreError::Serialize)?;

        let tmp_path = self.tmp_path();
        std::fs::write(&tmp_path, bytes).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(path = %self.path.display(), records = records.len(), "store snapshot saved");
        Ok(records.len())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl ResultSink for JsonStore {
    fn insert(&self, record: Record) {
        self.inner.insert(record);
    }
}

impl ResultSource for JsonStore {
    fn query(&self, pagination: Pagination) -> Page<Record> {
        self.inner.query(pagination)
    }
}
