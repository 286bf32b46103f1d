//! Circuit breaker for external endpoint protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: endpoint assumed down, calls fail fast
//! - Half-Open: a single probe tests whether the endpoint recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure ratio >= threshold over the window, with enough samples
//! Open → Half-Open: first admission check after the cooldown
//! Half-Open → Closed: probe succeeds (window cleared)
//! Half-Open → Open: probe fails (cooldown restarts)
//! ```
//!
//! # Design Decisions
//! - One breaker per endpoint name, shared by every in-flight call
//! - All state behind one mutex; callers only see `try_acquire` and `CallPermit::record`
//! - Every transition bumps a generation so late outcomes from calls admitted under
//!   an older state are ignored
//! - An unreported probe permit releases the probe slot on drop

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;

use crate::config::CircuitBreakerConfig;
use crate::observability::metrics;
use crate::resilience::outcome::CallError;

/// Breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl BreakerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half_open",
        }
    }
}

/// Point-in-time view of a breaker, for admin endpoints and logs.
#[derive(Debug, Clone, Serialize)]
pub struct BreakerSnapshot {
    pub name: String,
    pub state: BreakerState,
    pub window_len: usize,
    pub failures: usize,
    pub failure_rate: f64,
}

#[derive(Debug)]
struct Inner {
    state: BreakerState,
    /// `true` marks a failure. Oldest outcome at the front.
    window: VecDeque<bool>,
    failures: usize,
    opened_at: Option<Instant>,
    probe_in_flight: bool,
    generation: u64,
}

impl Inner {
    fn failure_rate(&self) -> f64 {
        if self.window.is_empty() {
            0.0
        } else {
            self.failures as f64 / self.window.len() as f64
        }
    }

    fn clear_window(&mut self) {
        self.window.clear();
        self.failures = 0;
    }

    fn transition(&mut self, to: BreakerState) -> (BreakerState, BreakerState) {
        let from = self.state;
        self.state = to;
        self.generation += 1;
        match to {
            BreakerState::Open => {
                self.opened_at = Some(Instant::now());
                self.probe_in_flight = false;
                self.clear_window();
            }
            BreakerState::HalfOpen => {
                self.probe_in_flight = false;
            }
            BreakerState::Closed => {
                self.opened_at = None;
                self.probe_in_flight = false;
                self.clear_window();
            }
        }
        (from, to)
    }
}

/// Circuit breaker guarding one external endpoint.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        let name = name.into();
        metrics::record_breaker_state(&name, BreakerState::Closed);
        Self {
            name,
            inner: Mutex::new(Inner {
                state: BreakerState::Closed,
                window: VecDeque::with_capacity(config.window_size),
                failures: 0,
                opened_at: None,
                probe_in_flight: false,
                generation: 0,
            }),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state. Does not advance Open → Half-Open; only admission does.
    pub fn state(&self) -> BreakerState {
        self.lock().state
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        let inner = self.lock();
        BreakerSnapshot {
            name: self.name.clone(),
            state: inner.state,
            window_len: inner.window.len(),
            failures: inner.failures,
            failure_rate: inner.failure_rate(),
        }
    }

    /// Admission check.
    ///
    /// Returns a permit the caller must report the attempt's outcome through, or
    /// `CallError::BreakerOpen` when the call must not reach the transport.
    pub fn try_acquire(self: &Arc<Self>) -> Result<CallPermit, CallError> {
        let mut inner = self.lock();
        let mut transition = None;

        let probe = match inner.state {
            BreakerState::Closed => false,
            BreakerState::Open => {
                let cooled = inner
                    .opened_at
                    .map(|at| at.elapsed() >= self.config.cooldown())
                    .unwrap_or(true);
                if !cooled {
                    drop(inner);
                    return Err(self.reject());
                }
                transition = Some(inner.transition(BreakerState::HalfOpen));
                inner.probe_in_flight = true;
                true
            }
            BreakerState::HalfOpen => {
                if inner.probe_in_flight {
                    drop(inner);
                    return Err(self.reject());
                }
                inner.probe_in_flight = true;
                true
            }
        };

        let generation = inner.generation;
        drop(inner);

        if let Some((from, to)) = transition {
            self.announce(from, to);
        }
        if probe {
            tracing::info!(endpoint = %self.name, "Circuit breaker admitting probe call");
        }

        Ok(CallPermit {
            breaker: Arc::clone(self),
            probe,
            generation,
            reported: false,
        })
    }

    fn reject(&self) -> CallError {
        tracing::debug!(endpoint = %self.name, "Circuit breaker rejected call");
        metrics::record_breaker_rejection(&self.name);
        CallError::BreakerOpen {
            endpoint: self.name.clone(),
        }
    }

    fn on_outcome(&self, probe: bool, generation: u64, success: bool) {
        let mut inner = self.lock();
        if inner.generation != generation {
            // Admitted under an older state.
            return;
        }

        let transition = match (inner.state, probe) {
            (BreakerState::Closed, false) => {
                inner.window.push_back(!success);
                if !success {
                    inner.failures += 1;
                }
                if inner.window.len() > self.config.window_size {
                    if let Some(true) = inner.window.pop_front() {
                        inner.failures -= 1;
                    }
                }

                let samples = inner.window.len();
                let rate = inner.failure_rate();
                if samples >= self.config.minimum_calls
                    && rate >= self.config.failure_rate_threshold
                {
                    tracing::warn!(
                        endpoint = %self.name,
                        failure_rate = rate,
                        samples,
                        "Failure threshold reached"
                    );
                    Some(inner.transition(BreakerState::Open))
                } else {
                    None
                }
            }
            (BreakerState::HalfOpen, true) if success => Some(inner.transition(BreakerState::Closed)),
            (BreakerState::HalfOpen, true) => Some(inner.transition(BreakerState::Open)),
            _ => None,
        };
        drop(inner);

        if let Some((from, to)) = transition {
            self.announce(from, to);
        }
    }

    fn release_probe(&self, generation: u64) {
        let mut inner = self.lock();
        if inner.state == BreakerState::HalfOpen && inner.generation == generation {
            inner.probe_in_flight = false;
            tracing::debug!(endpoint = %self.name, "Probe abandoned; slot released");
        }
    }

    fn announce(&self, from: BreakerState, to: BreakerState) {
        match to {
            BreakerState::Open => tracing::warn!(
                endpoint = %self.name,
                from = from.as_str(),
                cooldown_ms = self.config.cooldown_ms,
                "Circuit breaker opened"
            ),
            _ => tracing::info!(
                endpoint = %self.name,
                from = from.as_str(),
                to = to.as_str(),
                "Circuit breaker transition"
            ),
        }
        metrics::record_breaker_state(&self.name, to);
    }
}

/// Admission granted by [`CircuitBreaker::try_acquire`].
#[derive(Debug)]
pub struct CallPermit {
    breaker: Arc<CircuitBreaker>,
    probe: bool,
    generation: u64,
    reported: bool,
}

impl CallPermit {
    pub fn is_probe(&self) -> bool {
        self.probe
    }

    /// Feed the attempt's outcome back to the breaker.
    pub fn record(mut self, success: bool) {
        self.reported = true;
        self.breaker.on_outcome(self.probe, self.generation, success);
    }
}

impl Drop for CallPermit {
    fn drop(&mut self) {
        if self.probe && !self.reported {
            self.breaker.release_probe(self.generation);
        }
    }
}
