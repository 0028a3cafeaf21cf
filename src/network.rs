//! Network utilities: fixed-delay retry, latency probing, rate limits
//!
//! Retry is a caller-side concern in this SDK — neither the subscription
//! registry nor the node client retries on its own. Callers opt in by
//! wrapping an operation with [`retry`].

use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::warn;

use crate::client::NodeClient;

/// HTTP status code for rate-limited requests
pub const RATE_LIMIT_STATUS: u16 = 429;

/// Fixed-delay retry policy
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Fixed delay between attempts
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
    /// Policy with the given attempt count and delay
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

/// Run a fallible async operation under a fixed-delay retry policy
///
/// The last error is returned once attempts are exhausted. A policy with
/// zero attempts is treated as one attempt.
pub async fn retry<F, Fut, T, E>(policy: RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                warn!(
                    attempt = attempt,
                    remaining = attempts - attempt,
                    delay_ms = policy.delay.as_millis(),
                    error = %e,
                    "operation failed, retrying"
                );
                sleep(policy.delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Measure round-trip latency to a node with a single ping
pub async fn measure_latency(client: &dyn NodeClient) -> crate::client::Result<Duration> {
    let start = Instant::now();
    client.ping().await?;
    Ok(start.elapsed())
}

/// Whether an HTTP status code signals rate limiting
pub fn is_rate_limited(status: u16) -> bool {
    status == RATE_LIMIT_STATUS
}
