//! Employee record types.

use serde::{Deserialize, Serialize};

/// Employment status. Deletion is a transition to `Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

/// A stored employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: u64,
    pub name: String,
    pub department: String,
    pub email: String,
    pub salary: f64,
    pub status: EmployeeStatus,
    pub manager_id: Option<u64>,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

/// Body of a create request. Status is always forced to `Active`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub name: String,
    pub department: String,
    pub email: String,
    pub salary: f64,
    #[serde(default)]
    pub manager_id: Option<u64>,
}

/// Body of an update request. Replaces every field, manager included; an absent
/// `status` keeps the stored one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub name: String,
    pub department: String,
    pub email: String,
    pub salary: f64,
    #[serde(default)]
    pub status: Option<EmployeeStatus>,
    #[serde(default)]
    pub manager_id: Option<u64>,
}
