//! Retry logic.
//!
//! # Responsibilities
//! - Decide whether a classified failure is worth another attempt
//! - Execute attempts with backoff between them
//! - Bound the number of attempts per logical call
//!
//! # Design Decisions
//! - A breaker rejection is terminal for the logical call, even on a later attempt
//! - Backoff sleeps are async so other in-flight calls keep running
//! - Exhaustion surfaces the last classified failure unchanged

use std::collections::HashSet;
use std::future::Future;

use crate::config::{FailureKind, RetryConfig};
use crate::resilience::backoff::Backoff;
use crate::resilience::outcome::CallError;

/// Attempt bookkeeping for one logical call.
#[derive(Debug, Clone)]
pub struct RetryContext {
    attempt: u32,
    max_attempts: u32,
}

impl RetryContext {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Number of attempts started so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    fn begin_attempt(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }

    fn has_remaining(&self) -> bool {
        self.attempt < self.max_attempts
    }
}

/// Bounded retry with backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
    retry_on: HashSet<FailureKind>,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff, retry_on: impl IntoIterator<Item = FailureKind>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
            retry_on: retry_on
                .into_iter()
                .filter(|kind| *kind != FailureKind::BreakerOpen)
                .collect(),
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Backoff::from_config(config),
            config.retry_on.iter().copied(),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_retryable(&self, error: &CallError) -> bool {
        match error {
            CallError::BreakerOpen { .. } => false,
            other => self.retry_on.contains(&other.kind()),
        }
    }

    /// Run `call` until it succeeds, fails terminally, or attempts run out.
    ///
    /// `call` receives the 1-based attempt number.
    pub async fn execute<F, Fut, T>(&self, mut call: F) -> Result<T, CallError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, CallError>>,
    {
        let mut ctx = RetryContext::new(self.max_attempts);
        loop {
            let attempt = ctx.begin_attempt();
            let error = match call(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !self.is_retryable(&error) {
                tracing::debug!(attempt, error = %error, "Failure not retryable");
                return Err(error);
            }
            if !ctx.has_remaining() {
                tracing::warn!(attempts = ctx.attempt(), error = %error, "Retries exhausted");
                return Err(error);
            }

            let delay = self.backoff.delay(attempt);
            tracing::info!(attempt, delay = ?delay, error = %error, "Retrying external call");
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(
            max_attempts,
            Backoff::fixed(Duration::from_millis(100)),
            [FailureKind::ConnectTimeout, FailureKind::ReadTimeout, FailureKind::Transport],
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_exactly_max_attempts_on_persistent_failure() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = policy(3)
            .execute(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(CallError::ReadTimeout) }
            })
            .await;
        assert_eq!(result, Err(CallError::ReadTimeout));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_returns_immediately() {
        let calls = AtomicU32::new(0);
        let result = policy(3)
            .execute(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(CallError::ConnectTimeout)
                    } else {
                        Ok("payload")
                    }
                }
            })
            .await;
        assert_eq!(result, Ok("payload"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_breaker_rejection_is_never_retried() {
        let calls = AtomicU32::new(0);
        let everything = RetryPolicy::new(
            5,
            Backoff::fixed(Duration::from_millis(10)),
            [FailureKind::BreakerOpen, FailureKind::Transport],
        );
        let result: Result<(), _> = everything
            .execute(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(CallError::BreakerOpen {
                        endpoint: "ext".into(),
                    })
                }
            })
            .await;
        assert!(matches!(result, Err(CallError::BreakerOpen { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_breaker_opening_mid_retry_stops_loop() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = policy(5)
            .execute(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt == 1 {
                        Err(CallError::Transport("reset".into()))
                    } else {
                        Err(CallError::BreakerOpen {
                            endpoint: "ext".into(),
                        })
                    }
                }
            })
            .await;
        assert!(matches!(result, Err(CallError::BreakerOpen { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_kind_outside_retry_set_fails_fast() {
        let calls = AtomicU32::new(0);
        let only_reads = RetryPolicy::new(
            3,
            Backoff::fixed(Duration::from_millis(10)),
            [FailureKind::ReadTimeout],
        );
        let result: Result<(), _> = only_reads
            .execute(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(CallError::Transport("dns".into())) }
            })
            .await;
        assert_eq!(result, Err(CallError::Transport("dns".into())));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_backoff_between_attempts() {
        let start = tokio::time::Instant::now();
        let _: Result<(), _> = RetryPolicy::new(
            3,
            Backoff::exponential(Duration::from_millis(100), Duration::from_secs(1)),
            [FailureKind::ConnectTimeout],
        )
        .execute(|_| async { Err(CallError::ConnectTimeout) })
        .await;
        // 100ms after the first failure, 200ms after the second, none after the last.
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[test]
    fn test_max_attempts_floor_is_one() {
        assert_eq!(policy(0).max_attempts(), 1);
    }
}
