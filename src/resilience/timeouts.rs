//! Timeout enforcement and failure classification.
//!
//! # Responsibilities
//! - Bound a whole outbound exchange with an overall deadline
//! - Turn transport errors into a `TransportFault` carrying the phase it failed in
//! - Classify each fault into exactly one `CallOutcome`
//!
//! # Design Decisions
//! - The connect deadline is enforced by the HTTP client's connector, the response
//!   deadline by the client's read timeout once connected; a Tokio deadline around
//!   the exchange is the backstop
//! - Timeout errors are distinct from other errors: connect timeouts surface as 503,
//!   read timeouts as 504

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::resilience::outcome::CallOutcome;

/// Raw failure seen by the transport, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFault {
    /// No connection was established.
    Connect { timed_out: bool, detail: String },
    /// Connected, but the response did not arrive within the deadline.
    ResponseDeadline(Duration),
    /// DNS, reset, protocol, status or body failures.
    Other(String),
}

impl From<reqwest::Error> for TransportFault {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            TransportFault::Connect {
                timed_out: err.is_timeout(),
                detail: err.to_string(),
            }
        } else if err.is_timeout() {
            TransportFault::ResponseDeadline(Duration::ZERO)
        } else {
            TransportFault::Other(err.to_string())
        }
    }
}

/// Map a transport fault to its semantic outcome.
pub fn classify(fault: TransportFault) -> CallOutcome {
    match fault {
        TransportFault::Connect { timed_out: true, .. } => CallOutcome::ConnectTimeout,
        TransportFault::Connect {
            timed_out: false,
            detail,
        } => CallOutcome::TransportError(detail),
        TransportFault::ResponseDeadline(_) => CallOutcome::ReadTimeout,
        TransportFault::Other(detail) => CallOutcome::TransportError(detail),
    }
}

/// Run an exchange under an overall deadline, reported as a response deadline.
///
/// A fault reported by the exchange itself wins over the deadline, so a connect
/// timeout that fires first is never reported as a read timeout.
pub async fn with_response_deadline<F, T>(deadline: Duration, exchange: F) -> Result<T, TransportFault>
where
    F: Future<Output = Result<T, TransportFault>>,
{
    match timeout(deadline, exchange).await {
        Ok(result) => result,
        Err(_) => Err(TransportFault::ResponseDeadline(deadline)),
    }
}
