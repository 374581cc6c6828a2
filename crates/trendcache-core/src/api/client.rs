//! API client for the TMDB trending endpoint.
//!
//! `ApiClient` is constructed explicitly and handed to the repository, so
//! tests and callers can point it at any base URL or swap in their own
//! `reqwest::Client`.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Map, Value};
use tracing::debug;

use super::{ApiError, TrendingSource};
use crate::models::TrendingResponse;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the TMDB v3 API
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Trending movies, day window
const TRENDING_ENDPOINT: &str = "trending/movie/day";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// API client for TMDB.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the public API with the default timeout
    pub fn new() -> Result<Self, ApiError> {
        Self::with_options(DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client for the given base URL and request timeout
    pub fn with_options(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::from_transport)?;

        Ok(Self::with_client(client, base_url))
    }

    /// Wrap an existing HTTP client, sharing its connection pool.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn trending_url(&self) -> String {
        format!("{}/{}", self.base_url, TRENDING_ENDPOINT)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Decode a trending body. The envelope must be a JSON object; every
    /// field in it is optional, so anything else would decode as empty.
    fn decode_trending(text: &str) -> Result<TrendingResponse, ApiError> {
        let object: Map<String, Value> = serde_json::from_str(text)?;
        Ok(serde_json::from_value(Value::Object(object))?)
    }

    /// Fetch today's trending movies.
    pub async fn fetch_trending_movies(&self, api_key: &str) -> Result<TrendingResponse, ApiError> {
        let url = self.trending_url();
        debug!(url = %url, "Fetching trending movies");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", api_key)])
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let response = Self::check_response(response).await?;

        let text = response.text().await.map_err(ApiError::from_transport)?;
        let parsed = Self::decode_trending(&text)?;

        debug!(count = parsed.results.len(), page = ?parsed.page, "Trending response received");
        Ok(parsed)
    }
}

impl TrendingSource for ApiClient {
    async fn fetch_trending(&self, api_key: &str) -> Result<TrendingResponse, ApiError> {
        self.fetch_trending_movies(api_key).await
    }
}
