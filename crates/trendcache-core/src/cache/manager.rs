use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use super::record::{to_records, CachedMovie};
use super::{SnapshotStore, StoreError};
use crate::models::Movie;

/// Cache file holding the trending snapshot
const TRENDING_CACHE: &str = "trending";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                // Round up: 1h 30m+ becomes 2h
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                // Round up: 1d 12h+ becomes 2d
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

struct Inner {
    cache_dir: PathBuf,
    // Guards the snapshot file. Taken inside the blocking task so a caller
    // that stops waiting can't release it while a write is still running.
    lock: RwLock<()>,
}

/// Durable snapshot store backed by a JSON file in the cache directory.
/// Clone is cheap and clones share the same lock.
#[derive(Clone)]
pub struct CacheManager {
    inner: Arc<Inner>,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&cache_dir).map_err(|e| StoreError::io(&cache_dir, e))?;
        Ok(Self {
            inner: Arc::new(Inner {
                cache_dir,
                lock: RwLock::new(()),
            }),
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.inner.cache_dir
    }

    /// Age of the current snapshot for display, e.g. "5m ago".
    pub async fn snapshot_age(&self) -> Option<String> {
        let inner = Arc::clone(&self.inner);
        let loaded = run_blocking(move || {
            let _guard = inner.lock.read().map_err(|_| StoreError::LockPoisoned)?;
            inner.load::<Vec<CachedMovie>>(TRENDING_CACHE)
        })
        .await;

        match loaded {
            Ok(Some(cached)) => Some(cached.age_display()),
            Ok(None) => None,
            Err(e) => {
                debug!(cache = TRENDING_CACHE, error = %e, "Failed to load cache for age display");
                None
            }
        }
    }
}

impl Inner {
    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>, StoreError> {
        let path = self.cache_path(name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .map_err(|source| StoreError::Corrupt { path, source })?;

        Ok(Some(cached))
    }

    /// Write to a sibling temp file, flush it to disk, then rename it over
    /// the real file. Readers see the old file until the rename lands.
    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<(), StoreError> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let tmp_path = self.cache_dir.join(format!("{}.json.tmp", name));
        let contents = serde_json::to_vec(&cached)?;

        let mut file = File::create(&tmp_path).map_err(|e| StoreError::io(&tmp_path, e))?;
        file.write_all(&contents)
            .and_then(|_| file.sync_all())
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        drop(file);

        fs::rename(&tmp_path, &path).map_err(|e| StoreError::io(&path, e))?;
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), StoreError> {
        let path = self.cache_path(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

/// Run storage work on the blocking pool. Once started, the work runs to
/// completion even if the awaiting future is dropped.
async fn run_blocking<T, F>(f: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::TaskFailed(e.to_string()))?
}

impl SnapshotStore for CacheManager {
    async fn replace_all(&self, movies: &[Movie]) -> Result<(), StoreError> {
        let records = to_records(movies);
        let inner = Arc::clone(&self.inner);
        let count = records.len();

        run_blocking(move || {
            let _guard = inner.lock.write().map_err(|_| StoreError::LockPoisoned)?;
            inner.save(TRENDING_CACHE, &records)
        })
        .await?;

        debug!(count, "Replaced trending snapshot");
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<Movie>, StoreError> {
        let inner = Arc::clone(&self.inner);

        let cached = run_blocking(move || {
            let _guard = inner.lock.read().map_err(|_| StoreError::LockPoisoned)?;
            inner.load::<Vec<CachedMovie>>(TRENDING_CACHE)
        })
        .await?;

        Ok(cached
            .map(|c| c.data.into_iter().map(Movie::from).collect())
            .unwrap_or_default())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let inner = Arc::clone(&self.inner);

        run_blocking(move || {
            let _guard = inner.lock.write().map_err(|_| StoreError::LockPoisoned)?;
            inner.remove(TRENDING_CACHE)
        })
        .await?;

        debug!("Cleared trending snapshot");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
