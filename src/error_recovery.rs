// src/error_recovery.rs
//! Bounded retry for operations that can come back transiently empty.

use crate::constants::RETRY_MAX_DELAY_MS;
use crate::error::AppError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// How many times to re-run an operation and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry, capped at `max_delay`; zero disables
    /// backoff.
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Overall budget for the whole sequence of attempts.
    pub deadline: Option<Duration>,
}

impl RetryPolicy {
    /// Immediate retries, no backoff, no deadline.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::ZERO,
            max_delay: Duration::from_millis(RETRY_MAX_DELAY_MS),
            deadline: None,
        }
    }

    pub fn with_backoff(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// What one attempt produced.
#[derive(Debug)]
pub enum Attempt<T> {
    Ready(T),
    /// Valid but incomplete; worth asking again.
    TransientEmpty,
}

/// How a retry sequence ended.
#[derive(Debug)]
pub enum RetryOutcome<T> {
    Ready(T),
    /// Every attempt came back transient.
    Exhausted { attempts: u32 },
    /// The caller's token fired or the deadline passed.
    Cancelled { attempts: u32 },
    /// A non-transient error stopped the sequence.
    Failed(AppError),
}

/// Runs `operation` until it is ready, the attempts run out, or the caller
/// cancels.
///
/// Transient errors (see [`AppError::is_transient`]) are logged and count as
/// an attempt; any other error ends the sequence immediately.
pub async fn retry_until_ready<T, F, Fut>(
    mut operation: F,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> RetryOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Attempt<T>, AppError>>,
{
    let deadline = policy.deadline.map(|budget| Instant::now() + budget);
    let expired = async move {
        match deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(expired);

    let max_attempts = policy.max_attempts();
    let mut delay = std::cmp::min(policy.initial_delay, policy.max_delay);

    for attempt in 1..=max_attempts {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return RetryOutcome::Cancelled { attempts: attempt - 1 },
            _ = &mut expired => return RetryOutcome::Cancelled { attempts: attempt - 1 },
            result = operation(attempt) => result,
        };

        match result {
            Ok(Attempt::Ready(value)) => return RetryOutcome::Ready(value),
            Ok(Attempt::TransientEmpty) => {
                log::debug!("Attempt {}/{} came back empty", attempt, max_attempts);
            }
            Err(e) if e.is_transient() => {
                log::warn!("Attempt {}/{} failed: {}", attempt, max_attempts, e);
            }
            Err(e) => return RetryOutcome::Failed(e),
        }

        if attempt < max_attempts && !delay.is_zero() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return RetryOutcome::Cancelled { attempts: attempt },
                _ = &mut expired => return RetryOutcome::Cancelled { attempts: attempt },
                _ = tokio::time::sleep(delay) => {}
            }
            // Exponential backoff with cap
            delay = std::cmp::min(delay * 2, policy.max_delay);
        }
    }

    RetryOutcome::Exhausted {
        attempts: max_attempts,
    }
}
