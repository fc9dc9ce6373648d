//! Bounded retry with backoff
//!
//! Both remote services are rate limited, so every call goes through the
//! same schedule:
//!
//! - **Rate limited** (HTTP 429): exponential backoff, `base * 2^attempt`
//!   (1s, 2s, 4s with the default base)
//! - **Any other retryable failure** (transport error, timeout, non-success
//!   status): a flat delay (1s by default)
//! - **Non-retryable failure** (e.g. a malformed response body): returned
//!   immediately
//!
//! The total number of attempts is bounded by [`RetryPolicy::max_attempts`].

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::SyncConfig;

/// Default number of attempts per call (first try included)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay for rate-limit backoff
pub const DEFAULT_BASE_BACKOFF: Duration = Duration::from_secs(1);

/// Default flat delay after a non rate-limit failure
pub const DEFAULT_TRANSPORT_DELAY: Duration = Duration::from_secs(1);

/// How a failed attempt should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The service asked us to slow down
    RateLimited,
    /// Transport error or unexpected status; retried after a flat delay
    Transient,
    /// Retrying cannot help (e.g. undecodable body)
    Fatal,
}

/// Errors that can be classified for retry purposes
pub trait Retryable {
    fn failure_kind(&self) -> FailureKind;
}

/// Retry schedule for calls to the remote services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Always at least 1.
    pub max_attempts: u32,
    /// Base of the exponential rate-limit backoff
    pub base_backoff: Duration,
    /// Flat delay used for every other retryable failure
    pub transport_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: DEFAULT_BASE_BACKOFF,
            transport_delay: DEFAULT_TRANSPORT_DELAY,
        }
    }
}

impl From<&SyncConfig> for RetryPolicy {
    fn from(config: &SyncConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_backoff: Duration::from_millis(config.base_backoff_ms),
            transport_delay: Duration::from_millis(config.transport_retry_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// A policy with millisecond delays, handy for tests against mock servers
    pub fn fast(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_backoff: Duration::from_millis(1),
            transport_delay: Duration::from_millis(1),
        }
    }

    /// Delay to wait after the failed attempt with 0-based index `attempt`
    ///
    /// Returns `None` when the failure is fatal or no attempts remain.
    pub fn delay_after(&self, kind: FailureKind, attempt: u32) -> Option<Duration> {
        if attempt + 1 >= self.max_attempts {
            return None;
        }
        match kind {
            FailureKind::RateLimited => {
                let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
                Some(self.base_backoff.saturating_mul(factor))
            }
            FailureKind::Transient => Some(self.transport_delay),
            FailureKind::Fatal => None,
        }
    }

    /// Runs `f` until it succeeds, fails fatally, or attempts run out
    ///
    /// The last error is returned once the schedule is exhausted.
    pub async fn run<F, Fut, T, E>(&self, operation: &str, mut f: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + std::fmt::Display,
    {
        let mut attempt: u32 = 0;
        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 0 {
                        info!(operation, attempt, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => {
                    let kind = err.failure_kind();
                    match self.delay_after(kind, attempt) {
                        Some(delay) => {
                            warn!(
                                operation,
                                attempt = attempt + 1,
                                max_attempts = self.max_attempts,
                                delay_ms = delay.as_millis() as u64,
                                error = %err,
                                "Request failed, retrying"
                            );
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                        }
                        None => {
                            if kind != FailureKind::Fatal {
                                warn!(
                                    operation,
                                    attempts = attempt + 1,
                                    error = %err,
                                    "Retry limit exhausted"
                                );
                            }
                            return Err(err);
                        }
                    }
                }
            }
        }
    }
}
