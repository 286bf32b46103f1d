//! Wire payload exchanged with the external service.

use serde::{Deserialize, Serialize};

use crate::employees::{Employee, EmployeeStatus};

/// `{id, name, department, email, salary, status}`; manager links stay internal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalEmployee {
    pub id: u64,
    pub name: String,
    pub department: String,
    pub email: String,
    pub salary: f64,
    pub status: EmployeeStatus,
}

impl From<&Employee> for ExternalEmployee {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name.clone(),
            department: employee.department.clone(),
            email: employee.email.clone(),
            salary: employee.salary,
            status: employee.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_drops_manager_link() {
        let employee = Employee {
            id: 7,
            name: "Grace".into(),
            department: "Research".into(),
            email: "grace@company.com".into(),
            salary: 90_000.0,
            status: EmployeeStatus::Active,
            manager_id: Some(1),
        };
        let json = serde_json::to_value(ExternalEmployee::from(&employee)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "name": "Grace",
                "department": "Research",
                "email": "grace@company.com",
                "salary": 90000.0,
                "status": "ACTIVE"
            })
        );
    }
}
