//! Handlers that reach the external service through the gateway.

use axum::extract::{Path, State};

use crate::external::ExternalEmployee;
use crate::http::response::ApiError;
use crate::http::server::AppState;

/// `GET /api/employees/external/{query}`: relay the external payload as-is.
pub async fn fetch_external(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<String, ApiError> {
    Ok(state.gateway.fetch(&query).await?)
}

/// `POST /api/employees/external/{id}`: send a stored employee to the external service.
pub async fn forward_external(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<String, ApiError> {
    let employee = state.employees.get(id)?;
    Ok(state.gateway.forward(&ExternalEmployee::from(&employee)).await?)
}
