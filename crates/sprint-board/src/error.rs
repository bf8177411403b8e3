//! Board loader error types.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    /// HTTP transport error (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The board API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The API returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Credentials are missing.
    #[error("board access not configured: {0}")]
    NotConfigured(String),

    /// Board data does not match the expected shape. Never retried.
    #[error("malformed board data: {0}")]
    Malformed(String),

    /// A snapshot file could not be read or written.
    #[error("snapshot file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BoardError {
    /// Transient failures worth retrying: transport errors, rate limiting and 5xx.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(error) => !error.is_decode() && !error.is_builder(),
            Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::NotConfigured(_) | Self::Malformed(_) | Self::Io { .. } => false,
        }
    }

    /// Minimum wait the server asked for before the next attempt.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after_secs } => Some(Duration::from_secs(*retry_after_secs)),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(error: serde_json::Error) -> Self {
        Self::Malformed(error.to_string())
    }
}
