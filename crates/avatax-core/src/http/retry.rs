//! Bounded immediate retry for transport calls
//!
//! Retries are immediate: no backoff delay and no jitter. A call is retried
//! only when its failure is on the transient allow-list; fatal failures
//! propagate on the first occurrence. Exhausting the budget produces a
//! tagged [`RetryOutcome::Exhausted`] rather than an error, so each caller
//! can choose its own degraded fallback.

use crate::http::error::HttpError;
use crate::Result;

/// Retry policy configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts for one logical call, including the first
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 2 }
    }
}

impl RetryPolicy {
    /// Create a new retry policy with the given attempt budget
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Attempts actually made; a zero budget still attempts once
    pub fn effective_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Outcome of a retried transport call
#[derive(Debug)]
pub enum RetryOutcome<T> {
    /// The operation succeeded within the budget
    Completed(T),
    /// The budget was exhausted; carries the last transient error
    Exhausted(HttpError),
}

impl<T> RetryOutcome<T> {
    /// The successful value, if any
    pub fn completed(self) -> Option<T> {
        match self {
            RetryOutcome::Completed(value) => Some(value),
            RetryOutcome::Exhausted(_) => None,
        }
    }

    /// Whether the retry budget ran out
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryOutcome::Exhausted(_))
    }
}

/// Execute an operation with bounded immediate retry
///
/// `operation` performs one network round trip per invocation. Transient
/// failures consume one unit of the budget and are retried immediately;
/// a fatal failure is logged and returned as `Err` without retry.
pub async fn execute_with_retry<F, Fut, T>(
    mut operation: F,
    policy: RetryPolicy,
    context: &str,
) -> Result<RetryOutcome<T>>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<T, HttpError>>,
{
    let attempts = policy.effective_attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;
        let error = match operation().await {
            Ok(value) => return Ok(RetryOutcome::Completed(value)),
            Err(error) => error,
        };

        if !error.is_transient() {
            log::error!("{}: fatal transport failure: {}", context, error);
            return Err(error.into());
        }

        if attempt >= attempts {
            log::error!(
                "{}: retry budget exhausted after {} attempts: {}",
                context,
                attempt,
                error
            );
            return Ok(RetryOutcome::Exhausted(error));
        }

        log::warn!(
            "{}: transient failure on attempt {}/{}, retrying: {}",
            context,
            attempt,
            attempts,
            error
        );
    }
}
