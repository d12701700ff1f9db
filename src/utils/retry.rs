//! Rate-limit retry for network collaborators
//!
//! Rate-limited requests (HTTP 429) are retried exactly once after a fixed
//! delay. Anything else, including a second 429, is handed back to the caller,
//! which applies its own fallback policy.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::utils::error::FetchError;

/// Configuration for the single rate-limit retry
#[derive(Debug, Clone)]
pub struct RateLimitRetry {
    /// Fixed delay before the retry
    pub delay: Duration,
}

impl Default for RateLimitRetry {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(120),
        }
    }
}

impl RateLimitRetry {
    /// Create a retry policy with a custom delay
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Create a retry policy with the delay given in seconds
    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }
}

/// Execute an operation, retrying it once if it reports a rate limit
///
/// # Arguments
///
/// * `policy` - Retry policy (fixed delay)
/// * `operation` - Async operation to run
///
/// # Returns
///
/// The first success, or the error of the last attempt
///
/// # Example
///
/// ```no_run
/// use ipolens::utils::error::FetchError;
/// use ipolens::utils::retry::{with_rate_limit_retry, RateLimitRetry};
///
/// # async fn example() -> Result<(), FetchError> {
/// let policy = RateLimitRetry::from_secs(1);
/// let body = with_rate_limit_retry(&policy, || async {
///     Ok::<_, FetchError>("data".to_string())
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn with_rate_limit_retry<T, F, Fut>(
    policy: &RateLimitRetry,
    operation: F,
) -> Result<T, FetchError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    match operation().await {
        Err(FetchError::RateLimit) => {
            warn!(
                delay_secs = policy.delay.as_secs_f64(),
                "Rate limited, retrying once after delay"
            );
            tokio::time::sleep(policy.delay).await;

            let result = operation().await;
            if result.is_ok() {
                debug!("Operation succeeded after rate-limit retry");
            }
            result
        }
        other => other,
    }
}
