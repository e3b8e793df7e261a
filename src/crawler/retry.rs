//! Exponential backoff for robots.txt and sitemap fetches
//!
//! Delays double from `base_delay` and are capped at `max_delay`
//! (1s, 2s, 4s, ... 32s with the defaults). Only transient failures are
//! retried; see [`FetchError::is_transient`].

use crate::config::RetryConfig;
use crate::{FetchError, FetchResult};
use std::future::Future;
use std::time::Duration;

/// How many times to try, and how long to wait between tries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// A single attempt with no waiting
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    /// Delay before retry number `retry` (0-based): min(base × 2^retry, max)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            config.attempts,
            Duration::from_millis(config.base_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }
}

/// Runs `operation` until it succeeds, fails permanently, or attempts run out
///
/// # Arguments
///
/// * `policy` - Attempt count and backoff bounds
/// * `label` - What is being fetched, for log lines
/// * `operation` - Produces a fresh future for every attempt
///
/// # Returns
///
/// The first success, or the last error seen
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> FetchResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_transient() || attempt >= policy.attempts => {
                if attempt > 1 {
                    tracing::warn!("Giving up on {} after {} attempts: {}", label, attempt, e);
                }
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_for(attempt - 1);
                tracing::debug!(
                    "Attempt {}/{} for {} failed ({}), retrying in {:?}",
                    attempt,
                    policy.attempts,
                    label,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::from_millis(1), Duration::from_millis(4))
    }

    fn server_error() -> FetchError {
        FetchError::Status {
            url: "https://example.com/sitemap.xml".to_string(),
            status: 503,
        }
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(4), Duration::from_secs(16));
        assert_eq!(policy.delay_for(5), Duration::from_secs(32));
        assert_eq!(policy.delay_for(9), Duration::from_secs(32));
        assert_eq!(policy.delay_for(40), Duration::from_secs(32));
    }

    #[test]
    fn test_attempts_at_least_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO, Duration::ZERO).attempts, 1);
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(&fast_policy(3), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(server_error())
                } else {
                    Ok("body")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("body"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: FetchResult<()> = retry_with_backoff(&fast_policy(3), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(server_error()) }
        })
        .await;

        assert_eq!(result, Err(server_error()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let calls = AtomicU32::new(0);
        let result: FetchResult<()> = retry_with_backoff(&fast_policy(5), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(FetchError::Status {
                    url: "https://example.com/missing".to_string(),
                    status: 404,
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
