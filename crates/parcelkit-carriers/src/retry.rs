//! Bounded exponential backoff for outbound carrier calls.
//!
//! Only transport failures reach the retry loop. An HTTP response of any
//! status is a result, and the carrier classifies it.

use std::future::Future;
use std::time::Duration;

/// Backoff schedule: `base`, `2 * base`, `4 * base`, ... for at most
/// `max_retries` extra attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    pub max_retries: u32,
    pub base: Duration,
}

impl Default for RetryPolicy {
    /// Three retries after 200ms, 400ms and 800ms.
    fn default() -> Self {
        Self {
            max_retries: 3,
            base: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (zero-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base.saturating_mul(2u32.saturating_pow(retry))
    }

    /// Run `call` until it succeeds, fails with an error `retryable`
    /// rejects, or the retry budget is spent. The last error is returned
    /// unchanged.
    pub async fn run<T, E, F, Fut, R>(&self, endpoint: &str, call: F, retryable: R) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&E) -> bool,
    {
        let mut retry = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if retry < self.max_retries && retryable(&e) => {
                    let delay = self.delay_for(retry);
                    retry += 1;
                    tracing::warn!(
                        %endpoint,
                        attempt = retry,
                        max_retries = self.max_retries,
                        ?delay,
                        "transport error, retrying: {e}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
