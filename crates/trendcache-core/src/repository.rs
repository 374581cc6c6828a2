//! Data access for the trending collection.
//!
//! [`TrendingRepository`] decides, per call, whether to go to the network or
//! to the local snapshot:
//!
//! - **Online**: ask the API. Failures are reported as errors and the cache
//!   is not consulted, so stale data is never passed off as live. A
//!   non-empty result replaces the snapshot before it is returned. An empty
//!   result leaves the snapshot alone.
//! - **Offline**: serve the snapshot if there is one, otherwise report that
//!   there is neither a connection nor cached data.

use std::future::Future;

use tracing::{debug, info, warn};

use crate::api::TrendingSource;
use crate::cache::{SnapshotStore, StoreError};
use crate::connectivity::Connectivity;
use crate::models::MovieList;
use crate::result::{FetchResult, NO_CONNECTION_NO_CACHE};

/// What the presentation layer needs from the data layer.
pub trait MovieRepository: Send + Sync {
    fn get_trending_movies(&self) -> impl Future<Output = FetchResult> + Send;
}

pub struct TrendingRepository<C, S, L> {
    connectivity: C,
    source: S,
    store: L,
    api_key: String,
}

impl<C, S, L> TrendingRepository<C, S, L>
where
    C: Connectivity,
    S: TrendingSource,
    L: SnapshotStore,
{
    pub fn new(connectivity: C, source: S, store: L, api_key: impl Into<String>) -> Self {
        Self {
            connectivity,
            source,
            store,
            api_key: api_key.into(),
        }
    }

    pub fn store(&self) -> &L {
        &self.store
    }

    /// Fetch the trending movies, falling back to the snapshot only when
    /// there is no network at all. Never fails: every problem comes back as
    /// `FetchResult::Error`.
    pub async fn get_trending_movies(&self) -> FetchResult {
        if self.connectivity.is_online() {
            debug!("Online, fetching trending movies from API");
            self.fetch_online().await
        } else {
            info!("Offline, serving trending movies from cache");
            self.read_offline().await
        }
    }

    /// Remove the cached snapshot.
    pub async fn clear_cache(&self) -> Result<(), StoreError> {
        self.store.clear().await
    }

    async fn fetch_online(&self) -> FetchResult {
        let movies = match self.source.fetch_trending(&self.api_key).await {
            Ok(response) => response.into_movies(),
            Err(e) => {
                warn!(error = %e, "Failed to fetch trending movies");
                return FetchResult::error_with_cause(e.to_string(), e);
            }
        };

        let Some(list) = MovieList::new(movies) else {
            // Keep whatever was cached before.
            info!("API returned no trending movies");
            return FetchResult::EmptySuccess;
        };

        match self.store.replace_all(&list).await {
            Ok(()) => debug!(count = list.len(), "Cached trending movies"),
            Err(e) => warn!(error = %e, "Failed to cache trending movies"),
        }

        FetchResult::Success(list)
    }

    async fn read_offline(&self) -> FetchResult {
        match self.store.read_all().await {
            Ok(movies) => match MovieList::new(movies) {
                Some(list) => {
                    debug!(count = list.len(), "Serving cached trending movies");
                    FetchResult::Success(list)
                }
                None => FetchResult::error(NO_CONNECTION_NO_CACHE),
            },
            Err(e) => {
                warn!(error = %e, "Failed to read cached trending movies");
                FetchResult::error_with_cause(format!("Failed to read cached data: {}", e), e)
            }
        }
    }
}

impl<C, S, L> MovieRepository for TrendingRepository<C, S, L>
where
    C: Connectivity,
    S: TrendingSource,
    L: SnapshotStore,
{
    async fn get_trending_movies(&self) -> FetchResult {
        TrendingRepository::get_trending_movies(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use tempfile::TempDir;

    use crate::api::ApiError;
    use crate::cache::{CacheManager, MemorySnapshotStore};
    use crate::connectivity::{ManualConnectivity, StaticConnectivity};
    use crate::models::{Movie, TrendingResponse};

    const API_KEY: &str = "test-key";

    /// Source that hands out queued responses and counts calls.
    #[derive(Default)]
    struct FakeSource {
        responses: Mutex<VecDeque<Result<TrendingResponse, ApiError>>>,
        calls: AtomicUsize,
        seen_keys: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn returning(movies: Vec<Movie>) -> Self {
            let source = Self::default();
            source.push_movies(movies);
            source
        }

        fn failing(err: ApiError) -> Self {
            let source = Self::default();
            source.responses.lock().unwrap().push_back(Err(err));
            source
        }

        fn push_movies(&self, movies: Vec<Movie>) {
            self.responses.lock().unwrap().push_back(Ok(TrendingResponse {
                page: Some(1),
                results: movies,
                total_pages: Some(1),
                total_results: None,
            }));
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TrendingSource for FakeSource {
        async fn fetch_trending(&self, api_key: &str) -> Result<TrendingResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_keys.lock().unwrap().push(api_key.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("FakeSource ran out of responses")
        }
    }

    /// Store whose writes always fail.
    #[derive(Default)]
    struct ReadOnlyStore {
        inner: MemorySnapshotStore,
    }

    impl SnapshotStore for ReadOnlyStore {
        async fn replace_all(&self, _movies: &[Movie]) -> Result<(), StoreError> {
            Err(StoreError::io(
                "/read-only/trending.json",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }

        async fn read_all(&self) -> Result<Vec<Movie>, StoreError> {
            self.inner.read_all().await
        }

        async fn clear(&self) -> Result<(), StoreError> {
            self.inner.clear().await
        }
    }

    fn movies(range: std::ops::RangeInclusive<i64>) -> Vec<Movie> {
        range.map(|i| Movie::new(i, format!("Movie {}", i))).collect()
    }

    fn ids(movies: &[Movie]) -> Vec<i64> {
        movies.iter().map(|m| m.id).collect()
    }

    fn server_error() -> ApiError {
        ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "")
    }

    async fn transport_error() -> ApiError {
        // An unparseable URL fails inside reqwest without touching the network.
        let err = reqwest::Client::new()
            .get("http://")
            .send()
            .await
            .unwrap_err();
        ApiError::from_transport(err)
    }

    fn repo<S: TrendingSource, L: SnapshotStore>(
        online: bool,
        source: S,
        store: L,
    ) -> TrendingRepository<StaticConnectivity, S, L> {
        TrendingRepository::new(StaticConnectivity(online), source, store, API_KEY)
    }

    #[tokio::test]
    async fn test_online_success_replaces_cache() {
        // Scenario A
        let source = FakeSource::returning(movies(1..=20));
        let store = MemorySnapshotStore::with_movies(&movies(100..=104));
        let repo = repo(true, source, store);

        let result = repo.get_trending_movies().await;

        let list = result.movies().expect("expected success");
        assert_eq!(list.len(), 20);
        assert_eq!(ids(&repo.store().read_all().await.unwrap()), ids(&movies(1..=20)));
        assert_eq!(repo.source.seen_keys.lock().unwrap().as_slice(), [API_KEY]);
    }

    #[tokio::test]
    async fn test_online_http_error_leaves_cache_alone() {
        // Scenario B
        let cached = movies(1..=5);
        let repo = repo(
            true,
            FakeSource::failing(server_error()),
            MemorySnapshotStore::with_movies(&cached),
        );

        let result = repo.get_trending_movies().await;

        assert_eq!(result.message(), Some("HTTP 500 Internal Server Error"));
        assert!(result.cause().is_some());
        assert_eq!(repo.store().read_all().await.unwrap(), cached);
    }

    #[tokio::test]
    async fn test_online_transport_error_does_not_fall_back() {
        let cached = movies(1..=3);
        let repo = repo(
            true,
            FakeSource::failing(transport_error().await),
            MemorySnapshotStore::with_movies(&cached),
        );

        let result = repo.get_trending_movies().await;

        let message = result.message().expect("expected error");
        assert!(message.starts_with("Network error"), "unexpected message: {message}");
        assert_eq!(repo.store().read_all().await.unwrap(), cached);
    }

    #[tokio::test]
    async fn test_online_decode_error_is_reported() {
        let parse_err = serde_json::from_str::<TrendingResponse>("{").unwrap_err();
        let repo = repo(
            true,
            FakeSource::failing(ApiError::from(parse_err)),
            MemorySnapshotStore::new(),
        );

        let result = repo.get_trending_movies().await;

        assert!(matches!(result, FetchResult::Error { .. }));
        assert!(repo.store().is_empty().await);
    }

    #[tokio::test]
    async fn test_offline_serves_cache() {
        // Scenario C
        let source = FakeSource::default();
        let repo = repo(false, source, MemorySnapshotStore::with_movies(&movies(1..=5)));

        let result = repo.get_trending_movies().await;

        assert_eq!(result.movies().map(|m| m.len()), Some(5));
        assert_eq!(repo.source.calls(), 0);
    }

    #[tokio::test]
    async fn test_offline_without_cache_is_an_error() {
        // Scenario D
        let repo = repo(false, FakeSource::default(), MemorySnapshotStore::new());

        let result = repo.get_trending_movies().await;

        assert_eq!(
            result.message(),
            Some("No internet connection and no cached data available")
        );
        assert!(result.cause().is_none());
    }

    #[tokio::test]
    async fn test_online_empty_result_keeps_cache() {
        // Scenario E
        let cached = movies(1..=5);
        let repo = repo(
            true,
            FakeSource::returning(Vec::new()),
            MemorySnapshotStore::with_movies(&cached),
        );

        let result = repo.get_trending_movies().await;

        assert!(matches!(result, FetchResult::EmptySuccess));
        assert_eq!(repo.store().read_all().await.unwrap(), cached);
    }

    #[tokio::test]
    async fn test_cache_write_failure_still_succeeds() {
        let repo = repo(true, FakeSource::returning(movies(1..=3)), ReadOnlyStore::default());

        let result = repo.get_trending_movies().await;

        assert_eq!(result.movies().map(|m| m.len()), Some(3));
    }

    #[tokio::test]
    async fn test_offline_corrupt_cache_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("trending.json"), "not json").unwrap();
        let store = CacheManager::new(dir.path().to_path_buf()).unwrap();
        let repo = repo(false, FakeSource::default(), store);

        let result = repo.get_trending_movies().await;

        let message = result.message().expect("expected error");
        assert!(message.starts_with("Failed to read cached data"), "unexpected message: {message}");
        assert!(result.cause().is_some());
    }

    #[tokio::test]
    async fn test_repeated_online_fetch_is_stable() {
        let source = FakeSource::returning(movies(1..=4));
        source.push_movies(movies(1..=4));
        let repo = repo(true, source, MemorySnapshotStore::new());

        let first = repo.get_trending_movies().await;
        let after_first = repo.store().read_all().await.unwrap();
        let second = repo.get_trending_movies().await;

        assert_eq!(first.movies(), second.movies());
        assert_eq!(repo.store().read_all().await.unwrap(), after_first);
    }

    #[tokio::test]
    async fn test_offline_after_online_serves_what_was_fetched() {
        let dir = TempDir::new().unwrap();
        let connectivity = Arc::new(ManualConnectivity::new(true));
        let mut fetched = movies(1..=3);
        fetched[0].genre_ids = vec![28, 12];
        let repo = TrendingRepository::new(
            Arc::clone(&connectivity),
            FakeSource::returning(fetched.clone()),
            CacheManager::new(dir.path().to_path_buf()).unwrap(),
            API_KEY,
        );

        assert!(repo.get_trending_movies().await.is_success());

        connectivity.set_online(false);
        let offline = repo.get_trending_movies().await;
        let served = offline.movies().expect("expected cached success");
        assert_eq!(ids(served), ids(&fetched));
        // Genres are network-only.
        assert!(served.first().genre_ids.is_empty());
        assert_eq!(repo.source.calls(), 1);
    }

    #[tokio::test]
    async fn test_clear_cache_then_offline_is_an_error() {
        let repo = repo(false, FakeSource::default(), MemorySnapshotStore::with_movies(&movies(1..=2)));

        repo.clear_cache().await.unwrap();

        assert_eq!(repo.get_trending_movies().await.message(), Some(NO_CONNECTION_NO_CACHE));
    }
}
