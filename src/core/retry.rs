//! Retry helper for async operations that may fail transiently
//!
//! Used for the scanner reachability probe only; scan actions are never retried.

use std::time::Duration;
use tokio::time::sleep;

/// Fixed-delay retry policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

/// Execute an async operation, retrying on error until the policy is exhausted
///
/// # Examples
/// ```rust
/// use zapscan::core::retry::{retry_async, RetryPolicy};
///
/// # async fn example() -> Result<String, String> {
/// let version = retry_async("scanner probe", RetryPolicy::default(), || async {
///     Ok::<String, String>("2.14.0".to_string())
/// })
/// .await?;
/// # Ok(version)
/// # }
/// ```
pub async fn retry_async<F, T, E, Fut>(
    operation_name: &str,
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) if attempt < attempts => {
                log::info!(
                    "{} failed on attempt {}/{}, retrying in {:?}: {}",
                    operation_name,
                    attempt,
                    attempts,
                    policy.delay,
                    error
                );
                sleep(policy.delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
