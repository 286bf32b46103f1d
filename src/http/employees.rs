//! Employee CRUD, search and hierarchy handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::employees::{Employee, EmployeeUpdate, NewEmployee};
use crate::http::response::ApiError;
use crate::http::server::AppState;

pub async fn create_employee(
    State(state): State<AppState>,
    Json(new): Json<NewEmployee>,
) -> Result<Json<Employee>, ApiError> {
    Ok(Json(state.employees.create(new)?))
}

pub async fn list_employees(State(state): State<AppState>) -> Json<Vec<Employee>> {
    Json(state.employees.list_active())
}

pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Employee>, ApiError> {
    Ok(Json(state.employees.get(id)?))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(update): Json<EmployeeUpdate>,
) -> Result<Json<Employee>, ApiError> {
    Ok(Json(state.employees.update(id, update)?))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.employees.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn search_employees(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    Ok(Json(state.employees.search(&name)?))
}

pub async fn employees_by_manager(
    State(state): State<AppState>,
    Path(manager_id): Path<u64>,
) -> Json<Vec<Employee>> {
    Json(state.employees.by_manager(manager_id))
}
