//! Employee records subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → service.rs (validation, manager resolution, soft delete)
//!     → store.rs (in-memory table)
//! ```
//!
//! # Design Decisions
//! - Deletion marks records inactive; listings and report lookups hide them,
//!   search and direct lookup do not
//! - Manager references are ids, resolved on every write

pub mod model;
pub mod service;
pub mod store;
pub mod validation;

pub use model::{Employee, EmployeeStatus, EmployeeUpdate, NewEmployee};
pub use service::{EmployeeError, EmployeeResult, EmployeeService};
pub use store::EmployeeStore;
