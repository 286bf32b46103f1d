//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to the external endpoint:
//!     → circuit_breaker.rs (admission: permit or fail fast)
//!     → timeouts.rs (connect/response deadlines, classify the fault)
//!     → circuit_breaker.rs (outcome fed back through the permit)
//!     → retries.rs (retryable and attempts left? back off via backoff.rs and go again)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Failures form a closed enum, matched exhaustively at each boundary
//! - Circuit breaker prevents cascading failures; its rejection is never retried
//! - Composition is explicit in the gateway rather than hidden in middleware

pub mod backoff;
pub mod circuit_breaker;
pub mod outcome;
pub mod registry;
pub mod retries;
pub mod timeouts;

pub use backoff::Backoff;
pub use circuit_breaker::{BreakerSnapshot, BreakerState, CallPermit, CircuitBreaker};
pub use outcome::{CallError, CallOutcome};
pub use registry::BreakerRegistry;
pub use retries::{RetryContext, RetryPolicy};
pub use timeouts::{classify, TransportFault};
