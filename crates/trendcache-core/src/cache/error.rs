use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during snapshot operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to create the cache directory or touch a cache file
    #[error("Failed to access cache file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A snapshot exists but can't be parsed
    #[error("Cached data is corrupt in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to serialize the snapshot
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A previous holder of the snapshot lock panicked
    #[error("Snapshot lock poisoned")]
    LockPoisoned,

    /// The blocking storage task was cancelled or panicked
    #[error("Storage task failed: {0}")]
    TaskFailed(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
