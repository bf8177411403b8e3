//! Bounded retry with exponential backoff for collaborator I/O.
//!
//! The analysis core never performs I/O. Board fetching and narrative
//! rendering wrap their requests in [`RetryPolicy::run`] so transient
//! failures are retried a small, configured number of times.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// How many times to retry and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. `0` disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each subsequent retry.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `retry` (0-based).
    #[must_use]
    pub fn backoff_for(&self, retry: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(retry))
    }

    /// Run `op`, retrying while `is_retryable` says the error is transient.
    ///
    /// Returns the first success, the first non-retryable error, or the last
    /// error once retries are exhausted.
    pub async fn run<T, E, F, Fut>(
        &self,
        operation: &str,
        is_retryable: impl Fn(&E) -> bool,
        op: F,
    ) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run_with_retry_after(operation, is_retryable, |_| None, op)
            .await
    }

    /// Like [`Self::run`], but waits at least as long as the server asked.
    ///
    /// `retry_after` extracts a delay hint (e.g. a `Retry-After` header) from
    /// the error; the actual wait is the larger of the hint and the backoff.
    pub async fn run_with_retry_after<T, E, F, Fut>(
        &self,
        operation: &str,
        is_retryable: impl Fn(&E) -> bool,
        retry_after: impl Fn(&E) -> Option<Duration>,
        mut op: F,
    ) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut retry = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) if retry < self.max_retries && is_retryable(&error) => {
                    let backoff = self.backoff_for(retry);
                    let delay = retry_after(&error).map_or(backoff, |hint| hint.max(backoff));
                    tracing::warn!(
                        operation,
                        %error,
                        attempt = retry + 1,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
