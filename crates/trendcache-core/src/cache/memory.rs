use tokio::sync::RwLock;

use super::record::{to_records, CachedMovie};
use super::{SnapshotStore, StoreError};
use crate::models::Movie;

/// Snapshot store that lives only as long as the process.
///
/// Follows the same rules as the on-disk store: records are keyed by id and
/// lose their genre ids on the way in.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    records: RwLock<Vec<CachedMovie>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out holding `movies`, as if a previous run had cached them.
    pub fn with_movies(movies: &[Movie]) -> Self {
        Self {
            records: RwLock::new(to_records(movies)),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    async fn replace_all(&self, movies: &[Movie]) -> Result<(), StoreError> {
        let records = to_records(movies);
        // Single assignment under the write lock: no await between clear and fill.
        *self.records.write().await = records;
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<Movie>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().cloned().map(Movie::from).collect())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.records.write().await.clear();
        Ok(())
    }
}
