//! Retrying of transient API failures.

use backon::{ExponentialBuilder, Retryable};
use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};

/// Configuration for a client's automatic retrying.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Number of retries (not counting the first try) for transient errors.
    /// Zero disables retries entirely. (default 3)
    pub retries: usize,

    /// Delay before the first retry; doubles on each further retry.
    /// (default 500ms)
    pub min_delay: Duration,

    /// Maximum interval between retries. (default 10s)
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            min_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            retries: 0,
            ..Self::default()
        }
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.retries)
            .with_jitter()
    }

    /// Runs `operation`, retrying while it fails with a retryable error.
    ///
    /// `name` identifies the operation in log output.
    pub async fn run<T, F, Fut>(&self, name: &str, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        operation
            .retry(self.backoff())
            .when(Error::is_retryable)
            .notify(|err: &Error, delay: Duration| {
                tracing::warn!(
                    operation = name,
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "Transient failure, retrying"
                );
            })
            .await
    }
}
