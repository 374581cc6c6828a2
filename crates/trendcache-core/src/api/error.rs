use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Non-2xx response. `message` reads `HTTP <code> <status text>`.
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        body: String,
    },

    #[error("Failed to parse API response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Maximum length for error response bodies kept on an error
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = format!(
            "HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )
        .trim_end()
        .to_string();
        let body = Self::truncate_body(body);
        debug!(status = status.as_u16(), body = %body, "API returned error status");
        ApiError::Http {
            status: status.as_u16(),
            message,
            body,
        }
    }

    /// Classify a transport failure. The request URL is stripped so the
    /// API key never ends up in a message shown to the user.
    pub fn from_transport(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            ApiError::Timeout(err)
        } else {
            ApiError::Network(err)
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
