//! Per-attempt outcomes and the failure surface exposed to callers.

use thiserror::Error;

use crate::config::FailureKind;

/// Result of one attempt against the external endpoint.
///
/// Produced once, at the transport boundary, and never reclassified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Success(String),
    ConnectTimeout,
    ReadTimeout,
    TransportError(String),
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success(_))
    }

    /// Metric/log label.
    pub fn label(&self) -> &'static str {
        match self {
            CallOutcome::Success(_) => "success",
            CallOutcome::ConnectTimeout => "connect_timeout",
            CallOutcome::ReadTimeout => "read_timeout",
            CallOutcome::TransportError(_) => "transport_error",
        }
    }

    pub fn into_result(self) -> Result<String, CallError> {
        match self {
            CallOutcome::Success(payload) => Ok(payload),
            CallOutcome::ConnectTimeout => Err(CallError::ConnectTimeout),
            CallOutcome::ReadTimeout => Err(CallError::ReadTimeout),
            CallOutcome::TransportError(cause) => Err(CallError::Transport(cause)),
        }
    }
}

/// Classified failure of a logical external call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("Connection to external service timed out")]
    ConnectTimeout,

    #[error("External service did not respond in time")]
    ReadTimeout,

    #[error("External service unreachable: {0}")]
    Transport(String),

    #[error("Circuit breaker '{endpoint}' is open; call rejected")]
    BreakerOpen { endpoint: String },
}

impl CallError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CallError::ConnectTimeout => FailureKind::ConnectTimeout,
            CallError::ReadTimeout => FailureKind::ReadTimeout,
            CallError::Transport(_) => FailureKind::Transport,
            CallError::BreakerOpen { .. } => FailureKind::BreakerOpen,
        }
    }
}
