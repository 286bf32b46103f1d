//! In-memory employee storage.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::employees::model::Employee;

/// A thread-safe employee table with an id sequence.
#[derive(Debug, Clone, Default)]
pub struct EmployeeStore {
    rows: Arc<DashMap<u64, Employee>>,
    sequence: Arc<AtomicU64>,
}

impl EmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id (starting at 1).
    pub fn next_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn save(&self, employee: Employee) -> Employee {
        self.rows.insert(employee.id, employee.clone());
        employee
    }

    pub fn find(&self, id: u64) -> Option<Employee> {
        self.rows.get(&id).map(|row| row.value().clone())
    }

    pub fn exists(&self, id: u64) -> bool {
        self.rows.contains_key(&id)
    }

    /// Every row matching `predicate`, ordered by id.
    pub fn filter<P>(&self, predicate: P) -> Vec<Employee>
    where
        P: Fn(&Employee) -> bool,
    {
        let mut rows: Vec<Employee> = self
            .rows
            .iter()
            .filter(|row| predicate(row.value()))
            .map(|row| row.value().clone())
            .collect();
        rows.sort_by_key(|e| e.id);
        rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
