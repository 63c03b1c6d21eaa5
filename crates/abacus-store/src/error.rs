use std::path::PathBuf;
use thiserror::Error;

/// Result type for store persistence.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures loading or saving a store snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, writing or renaming the snapshot file failed.
    #[error("failed to access store file {}: {source}", path.display())]
    Io {
        /// The file that was being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The snapshot exists but does not parse.
    #[error("corrupt store snapshot {}: {source}", path.display())]
    Corrupt {
        /// The snapshot file.
        path: PathBuf,
        /// The parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory records could not be serialized.
    #[error("failed to serialize store snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
}
