//! The outcome of one trending fetch.
//!
//! `FetchResult` is the only thing the data-access layer hands back to its
//! callers. Failures of any kind are folded into the `Error` variant, with
//! the original error kept around for diagnostics.

use std::fmt;
use std::sync::Arc;

use crate::models::{Movie, MovieList};

/// Message reported when the device is offline and nothing has been cached.
pub const NO_CONNECTION_NO_CACHE: &str = "No internet connection and no cached data available";

/// Underlying error retained on a failed fetch.
pub type ErrorCause = Arc<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone)]
pub enum FetchResult {
    /// At least one movie was fetched or served from cache.
    Success(MovieList),
    /// The request succeeded but returned nothing.
    EmptySuccess,
    Error {
        message: String,
        cause: Option<ErrorCause>,
    },
}

impl FetchResult {
    /// Wrap a fetched sequence, normalizing an empty one to `EmptySuccess`.
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        match MovieList::new(movies) {
            Some(list) => FetchResult::Success(list),
            None => FetchResult::EmptySuccess,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        FetchResult::Error {
            message: message.into(),
            cause: None,
        }
    }

    pub fn error_with_cause<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FetchResult::Error {
            message: message.into(),
            cause: Some(Arc::new(cause)),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success(_))
    }

    /// The movies carried by a `Success`, if any.
    pub fn movies(&self) -> Option<&MovieList> {
        match self {
            FetchResult::Success(list) => Some(list),
            _ => None,
        }
    }

    /// The message carried by an `Error`, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            FetchResult::Error { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn cause(&self) -> Option<&ErrorCause> {
        match self {
            FetchResult::Error { cause, .. } => cause.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for FetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchResult::Success(list) => write!(f, "{} movies", list.len()),
            FetchResult::EmptySuccess => write!(f, "no movies"),
            FetchResult::Error { message, .. } => write!(f, "error: {}", message),
        }
    }
}
