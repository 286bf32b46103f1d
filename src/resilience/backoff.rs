//! Backoff between attempts: fixed or exponential, optionally jittered.

use rand::Rng;
use std::time::Duration;

use crate::config::{BackoffStrategy, RetryConfig};

/// Delay schedule for a retry policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    pub strategy: BackoffStrategy,
    pub base_ms: u64,
    pub max_ms: u64,
    pub jitter: bool,
}

impl Backoff {
    pub fn fixed(delay: Duration) -> Self {
        let ms = delay.as_millis() as u64;
        Self {
            strategy: BackoffStrategy::Fixed,
            base_ms: ms,
            max_ms: ms,
            jitter: false,
        }
    }

    pub fn exponential(base: Duration, max: Duration) -> Self {
        Self {
            strategy: BackoffStrategy::Exponential,
            base_ms: base.as_millis() as u64,
            max_ms: max.as_millis() as u64,
            jitter: false,
        }
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            strategy: config.backoff,
            base_ms: config.base_delay_ms,
            max_ms: config.max_delay_ms,
            jitter: config.jitter,
        }
    }

    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay(&self, attempt: u32) -> Duration {
        let base = match self.strategy {
            BackoffStrategy::Fixed => Duration::from_millis(self.base_ms),
            BackoffStrategy::Exponential => calculate_backoff(attempt, self.base_ms, self.max_ms),
        };
        if self.jitter {
            apply_jitter(base)
        } else {
            base
        }
    }
}

/// Calculate exponential backoff delay: `base * 2^(attempt-1)`, capped at `max_ms`.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);

    Duration::from_millis(delay_ms.min(max_ms))
}

/// Add 0 to 10% of the delay on top.
pub fn apply_jitter(delay: Duration) -> Duration {
    let delay_ms = delay.as_millis() as u64;
    let jitter_range = delay_ms / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(delay_ms + jitter)
}
