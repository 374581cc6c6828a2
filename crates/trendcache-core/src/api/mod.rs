//! REST API client module for the trending movies endpoint.
//!
//! This module provides the [`TrendingSource`] seam the repository talks
//! to, and [`ApiClient`], the reqwest-backed implementation that calls
//! TMDB's "trending movies, day window" endpoint.
//!
//! The endpoint authenticates with an `api_key` query parameter.

pub mod client;
pub mod error;

use std::future::Future;
use std::sync::Arc;

pub use client::ApiClient;
pub use error::ApiError;

use crate::models::TrendingResponse;

/// Anything that can produce the trending payload.
///
/// One call is one request. Implementations do not retry.
pub trait TrendingSource: Send + Sync {
    fn fetch_trending(
        &self,
        api_key: &str,
    ) -> impl Future<Output = Result<TrendingResponse, ApiError>> + Send;
}

impl<T: TrendingSource> TrendingSource for Arc<T> {
    fn fetch_trending(
        &self,
        api_key: &str,
    ) -> impl Future<Output = Result<TrendingResponse, ApiError>> + Send {
        (**self).fetch_trending(api_key)
    }
}
