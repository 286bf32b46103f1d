//! Error-to-response mapping.
//!
//! | Failure                                   | Status |
//! |-------------------------------------------|--------|
//! | employee / manager / name not found       | 404    |
//! | invalid email or fields                   | 400    |
//! | connect timeout, transport, breaker open  | 503    |
//! | read timeout                              | 504    |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::employees::EmployeeError;
use crate::resilience::CallError;

/// Any failure a handler can surface.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Employee(#[from] EmployeeError),

    #[error(transparent)]
    External(#[from] CallError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Employee(e) => match e {
                EmployeeError::NotFound(_)
                | EmployeeError::ManagerNotFound(_)
                | EmployeeError::NoMatch(_) => StatusCode::NOT_FOUND,
                EmployeeError::InvalidEmail { .. } | EmployeeError::Invalid(_) => StatusCode::BAD_REQUEST,
            },
            ApiError::External(e) => match e {
                CallError::ReadTimeout => StatusCode::GATEWAY_TIMEOUT,
                CallError::ConnectTimeout | CallError::Transport(_) | CallError::BreakerOpen { .. } => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = %status, error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }
        (status, self.to_string()).into_response()
    }
}
