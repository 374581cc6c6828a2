//! Local caching module for offline data access.
//!
//! This module holds the single snapshot of the trending collection that
//! backs the offline path. The snapshot is replaced wholesale after every
//! successful online fetch with results, and never expires on its own.
//!
//! - [`CacheManager`]: durable JSON snapshot on disk
//! - [`MemorySnapshotStore`]: in-process snapshot with the same contract

pub mod error;
pub mod manager;
pub mod memory;
pub mod record;

use std::future::Future;
use std::sync::Arc;

pub use error::StoreError;
pub use manager::{CacheManager, CachedData};
pub use memory::MemorySnapshotStore;
pub use record::CachedMovie;

use crate::models::Movie;

/// Storage for the one cached snapshot.
///
/// `replace_all` must be all-or-nothing: a concurrent or later reader sees
/// either the previous snapshot or the new one, never a mix. Reads may run
/// in parallel with each other.
pub trait SnapshotStore: Send + Sync {
    /// Drop the current snapshot and store `movies` in its place.
    fn replace_all(&self, movies: &[Movie]) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// The current snapshot in stored order, empty if there is none.
    fn read_all(&self) -> impl Future<Output = Result<Vec<Movie>, StoreError>> + Send;

    /// Remove the snapshot. Clearing an empty store is not an error.
    fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl<T: SnapshotStore> SnapshotStore for Arc<T> {
    fn replace_all(&self, movies: &[Movie]) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).replace_all(movies)
    }

    fn read_all(&self) -> impl Future<Output = Result<Vec<Movie>, StoreError>> + Send {
        (**self).read_all()
    }

    fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).clear()
    }
}
