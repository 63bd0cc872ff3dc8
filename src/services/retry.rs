//! Bounded retry with exponential backoff and a per-attempt timeout.
//!
//! Attempts run strictly one after another. Attempt `n` (1-based) that
//! fails is followed by a sleep of `base_delay * 2^(n-1)`; the final attempt
//! is never followed by a sleep. Each attempt is abandoned once it exceeds
//! `attempt_timeout`.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Always at least 1 in practice.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub attempt_timeout: Duration,
}

/// Why a single attempt failed.
#[derive(Debug)]
pub enum AttemptError<E> {
    Timeout(Duration),
    Failed(E),
}

impl<E: fmt::Display> fmt::Display for AttemptError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout(d) => write!(f, "request timed out after {}ms", d.as_millis()),
            Self::Failed(e) => e.fmt(f),
        }
    }
}

/// Every attempt failed; carries the last failure.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last: AttemptError<E>,
}

impl RetryPolicy {
    /// Sleep that follows failed attempt `attempt` (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    ///
    /// `op` receives the 1-based attempt number.
    ///
    /// # Errors
    ///
    /// Returns [`RetryExhausted`] with the last attempt's failure.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let total = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let error = match tokio::time::timeout(self.attempt_timeout, op(attempt)).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => AttemptError::Failed(e),
                Err(_) => AttemptError::Timeout(self.attempt_timeout),
            };

            if attempt >= total {
                warn!(label, attempt, total, error = %error, "retry: attempts exhausted");
                return Err(RetryExhausted { attempts: attempt, last: error });
            }

            let delay = self.delay_after(attempt);
            warn!(
                label,
                attempt,
                total,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "retry: attempt failed; backing off"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
#[path = "retry_test.rs"]
mod tests;
