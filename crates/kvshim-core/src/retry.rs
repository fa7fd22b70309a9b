//! Bounded retry with a fixed delay between attempts

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

/// Attempts made before giving up on a dependency
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Pause between two attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Retry executor used to acquire dependencies at startup.
///
/// Every error returned by the operation is treated as retryable. The
/// executor keeps no state between calls.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    max_attempts: u32,
    delay: Duration,
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryExecutor {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `operation` until it succeeds or the attempt budget is spent.
    ///
    /// Returns the last error when every attempt failed. No delay follows
    /// the final attempt.
    pub async fn execute<F, Fut, T, E>(&self, name: &str, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts => {
                    warn!(
                        "{} not ready (attempt {}/{}): {}",
                        name, attempt, self.max_attempts, e
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(
                        "Failed to connect to {} after {} attempts: {}",
                        name, self.max_attempts, e
                    );
                    return Err(e);
                }
            }
        }
    }
}
