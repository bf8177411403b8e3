use std::time::Duration;

use sprint_report::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("narrative renderer not configured: {0}")]
    NotConfigured(String),

    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("model returned no text")]
    EmptyResponse,
}

impl NarrativeError {
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(error) => !error.is_decode() && !error.is_builder(),
            Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::NotConfigured(_) | Self::Parse(_) | Self::EmptyResponse => false,
        }
    }

    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after_secs } => Some(Duration::from_secs(*retry_after_secs)),
            _ => None,
        }
    }
}

impl From<NarrativeError> for RenderError {
    fn from(error: NarrativeError) -> Self {
        match error {
            NarrativeError::EmptyResponse => Self::EmptyResponse,
            other => Self::Unavailable(other.to_string()),
        }
    }
}
