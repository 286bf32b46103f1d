//! Operational endpoints: liveness and circuit breaker inspection.

pub mod handlers;

use axum::{routing::get, Router};

use self::handlers::*;
use crate::http::server::AppState;

pub fn setup_admin_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(get_health))
        .route("/admin/circuit-breakers", get(get_circuit_breakers))
}
