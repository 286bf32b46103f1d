//! Employee record operations.

use thiserror::Error;

use crate::employees::model::{Employee, EmployeeStatus, EmployeeUpdate, NewEmployee};
use crate::employees::store::EmployeeStore;
use crate::employees::validation::is_company_email;

/// Errors from employee operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmployeeError {
    #[error("Employee not found with id: {0}")]
    NotFound(u64),

    #[error("Manager not found with id: {0}")]
    ManagerNotFound(u64),

    #[error("Employee not found with name: {0}")]
    NoMatch(String),

    #[error("Email must be a company email (@{domain})")]
    InvalidEmail { domain: String },

    #[error("{0}")]
    Invalid(String),
}

pub type EmployeeResult<T> = Result<T, EmployeeError>;

/// CRUD, search and hierarchy lookups over the employee store.
#[derive(Debug, Clone)]
pub struct EmployeeService {
    store: EmployeeStore,
    email_domain: String,
}

impl EmployeeService {
    pub fn new(store: EmployeeStore, email_domain: impl Into<String>) -> Self {
        Self {
            store,
            email_domain: email_domain.into(),
        }
    }

    fn resolve_manager(&self, manager_id: Option<u64>) -> EmployeeResult<Option<u64>> {
        match manager_id {
            Some(id) if !self.store.exists(id) => Err(EmployeeError::ManagerNotFound(id)),
            other => Ok(other),
        }
    }

    #[tracing::instrument(level = "debug", skip(self, new))]
    pub fn create(&self, new: NewEmployee) -> EmployeeResult<Employee> {
        if new.name.trim().is_empty() {
            return Err(EmployeeError::Invalid("Name must not be blank".into()));
        }
        if !is_company_email(&new.email, &self.email_domain) {
            return Err(EmployeeError::InvalidEmail {
                domain: self.email_domain.clone(),
            });
        }
        let manager_id = self.resolve_manager(new.manager_id)?;

        let employee = self.store.save(Employee {
            id: self.store.next_id(),
            name: new.name,
            department: new.department,
            email: new.email,
            salary: new.salary,
            status: EmployeeStatus::Active,
            manager_id,
        });
        tracing::info!(id = employee.id, "Employee created");
        Ok(employee)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get(&self, id: u64) -> EmployeeResult<Employee> {
        self.store.find(id).ok_or(EmployeeError::NotFound(id))
    }

    #[tracing::instrument(level = "debug", skip(self, update))]
    pub fn update(&self, id: u64, update: EmployeeUpdate) -> EmployeeResult<Employee> {
        let mut employee = self.get(id)?;
        if update.manager_id == Some(id) {
            return Err(EmployeeError::Invalid("An employee cannot manage themselves".into()));
        }
        let manager_id = self.resolve_manager(update.manager_id)?;

        employee.name = update.name;
        employee.department = update.department;
        employee.email = update.email;
        employee.salary = update.salary;
        if let Some(status) = update.status {
            employee.status = status;
        }
        employee.manager_id = manager_id;

        let employee = self.store.save(employee);
        tracing::info!(id, "Employee updated");
        Ok(employee)
    }

    /// Soft delete: the record stays, marked inactive.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn delete(&self, id: u64) -> EmployeeResult<()> {
        let mut employee = self.get(id)?;
        employee.status = EmployeeStatus::Inactive;
        self.store.save(employee);
        tracing::info!(id, "Employee deactivated");
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn list_active(&self) -> Vec<Employee> {
        self.store.filter(Employee::is_active)
    }

    /// Case-insensitive substring match on name, regardless of status.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn search(&self, name: &str) -> EmployeeResult<Vec<Employee>> {
        let needle = name.to_lowercase();
        let matches = self
            .store
            .filter(|e| e.name.to_lowercase().contains(&needle));
        if matches.is_empty() {
            return Err(EmployeeError::NoMatch(name.to_string()));
        }
        Ok(matches)
    }

    /// Active direct reports of `manager_id`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn by_manager(&self, manager_id: u64) -> Vec<Employee> {
        self.store
            .filter(|e| e.is_active() && e.manager_id == Some(manager_id))
    }

    /// Stored records, inactive included.
    pub fn count(&self) -> usize {
        self.store.len()
    }
}
