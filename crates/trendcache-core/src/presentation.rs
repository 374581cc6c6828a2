//! Presentation state for the trending screen.
//!
//! [`MoviesUiState`] is what a screen renders; [`MoviesViewModel`] owns the
//! current state and turns repository results into it. Neither knows about
//! caching or the network.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::Movie;
use crate::repository::MovieRepository;
use crate::result::FetchResult;

#[derive(Debug, Clone, PartialEq)]
pub enum MoviesUiState {
    Loading,
    Success(Vec<Movie>),
    Empty,
    Error(String),
}

impl MoviesUiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, MoviesUiState::Loading)
    }

    /// Narrow a `Success` down to titles matching `query`.
    /// A blank query changes nothing; a query that matches nothing gives `Empty`.
    pub fn filtered(&self, query: &str) -> MoviesUiState {
        let query = query.trim();
        match self {
            MoviesUiState::Success(movies) if !query.is_empty() => {
                let matching: Vec<Movie> = movies
                    .iter()
                    .filter(|m| m.matches_query(query))
                    .cloned()
                    .collect();
                if matching.is_empty() {
                    MoviesUiState::Empty
                } else {
                    MoviesUiState::Success(matching)
                }
            }
            other => other.clone(),
        }
    }
}

impl From<FetchResult> for MoviesUiState {
    fn from(result: FetchResult) -> Self {
        match result {
            FetchResult::Success(list) => MoviesUiState::Success(list.into_vec()),
            FetchResult::EmptySuccess => MoviesUiState::Empty,
            FetchResult::Error { message, .. } => MoviesUiState::Error(message),
        }
    }
}

/// Holds the trending screen's state and runs fetches off the caller's task.
pub struct MoviesViewModel<R> {
    repository: Arc<R>,
    state: Arc<watch::Sender<MoviesUiState>>,
    // Bumped on every fetch so a slow, superseded fetch can't overwrite
    // the result of a newer one.
    generation: Arc<AtomicU64>,
}

impl<R> MoviesViewModel<R>
where
    R: MovieRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        let (state, _) = watch::channel(MoviesUiState::Loading);
        Self {
            repository,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> MoviesUiState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MoviesUiState> {
        self.state.subscribe()
    }

    /// Switch to `Loading` and fetch in the background.
    /// Must be called from within a tokio runtime.
    pub fn fetch_movies(&self) -> JoinHandle<()> {
        // Bump and reset under the channel's lock so no older fetch can
        // publish between the two.
        let mut generation = 0;
        self.state.send_modify(|current| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *current = MoviesUiState::Loading;
        });

        let repository = Arc::clone(&self.repository);
        let state = Arc::clone(&self.state);
        let latest = Arc::clone(&self.generation);

        tokio::spawn(async move {
            let result = repository.get_trending_movies().await;
            publish(&state, &latest, generation, result);
        })
    }

    /// Run the same fetch again, e.g. from an error screen's retry button.
    pub fn retry(&self) -> JoinHandle<()> {
        self.fetch_movies()
    }

    /// Wait for the first state that isn't `Loading`.
    pub async fn wait_until_settled(&self) -> MoviesUiState {
        let mut rx = self.subscribe();
        let settled = match rx.wait_for(|s| !s.is_loading()).await {
            Ok(state) => state.clone(),
            // The sender lives in `self`, so this can't close under us.
            Err(_) => self.state(),
        };
        settled
    }
}

/// Publish a fetch result unless a newer fetch has started since.
/// Returns whether the state changed.
fn publish(
    state: &watch::Sender<MoviesUiState>,
    latest: &AtomicU64,
    generation: u64,
    result: FetchResult,
) -> bool {
    state.send_if_modified(|current| {
        if latest.load(Ordering::SeqCst) != generation {
            debug!(generation, "Dropping result of superseded fetch");
            return false;
        }
        debug!(generation, result = %result, "Fetch finished");
        *current = MoviesUiState::from(result);
        true
    })
}
