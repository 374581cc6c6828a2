//! Trendcache core - trending movies that keep working offline.
//!
//! The data-access layer decides per request whether to hit the API or
//! serve the last snapshot, keeps that snapshot up to date, and reports
//! every outcome as a [`FetchResult`]:
//!
//! - [`api`]: TMDB client behind the [`TrendingSource`] seam
//! - [`cache`]: the single durable snapshot behind [`SnapshotStore`]
//! - [`connectivity`]: the online/offline oracle
//! - [`repository`]: the coordinator tying the three together
//! - [`presentation`]: UI state derived from fetch results

pub mod api;
pub mod cache;
pub mod config;
pub mod connectivity;
pub mod models;
pub mod presentation;
pub mod repository;
pub mod result;
pub mod utils;

pub use api::{ApiClient, ApiError, TrendingSource};
pub use cache::{CacheManager, MemorySnapshotStore, SnapshotStore, StoreError};
pub use config::Config;
pub use connectivity::{Connectivity, ManualConnectivity, RouteConnectivity, StaticConnectivity};
pub use models::{Movie, MovieList, TrendingResponse};
pub use presentation::{MoviesUiState, MoviesViewModel};
pub use repository::{MovieRepository, TrendingRepository};
pub use result::{FetchResult, NO_CONNECTION_NO_CACHE};
