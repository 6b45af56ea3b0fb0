//! Bounded retries for transient store failures.

use std::future::Future;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::error::AppError;

const MAX_RETRY_DELAY: Duration = Duration::from_secs(2);

/// How often and how patiently a store call is repeated.
///
/// Only [`AppError::Transient`] errors are retried. Delays grow exponentially
/// from `base_delay_ms` (2x, 4x, 8x...) with jitter, capped at two seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of tries, including the first one.
    pub attempts: usize,
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay_ms: 50,
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: usize, base_delay_ms: u64) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay_ms,
        }
    }

    /// A policy that tries exactly once.
    pub fn none() -> Self {
        Self::new(1, 0)
    }

    /// Runs `operation`, repeating it while it fails transiently.
    ///
    /// The last error is returned once the attempts are used up.
    pub async fn run<T, F, Fut>(&self, operation: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(self.base_delay_ms)
            .max_delay(MAX_RETRY_DELAY)
            .map(jitter)
            .take(self.attempts.saturating_sub(1));

        RetryIf::spawn(strategy, operation, |e: &AppError| e.is_transient()).await
    }
}
