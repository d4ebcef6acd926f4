//! Retry policy shared by every network call.
//!
//! Backoff is linear: after failed attempt `i` (zero based) the caller sleeps
//! `step * i` before trying again.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::Result;

const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_STEP_MILLIS: u64 = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            step: Duration::from_millis(DEFAULT_STEP_MILLIS),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries.
    pub fn once() -> Self {
        RetryPolicy { max_attempts: 1, step: Duration::ZERO }
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        self.step * attempt
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or
    /// the attempts are used up. The last error is returned.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt + 1 < attempts => {
                    let delay = self.backoff(attempt);
                    debug!("{} failed (attempt {}/{}): {}, retrying in {:?}", label, attempt + 1, attempts, err, delay);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
