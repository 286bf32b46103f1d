//! Employee service library.
//!
//! An employee CRUD API whose calls to an external employee service go through a
//! resilience layer: per-endpoint circuit breaker, bounded retries with backoff,
//! and timeout classification that separates connect failures from read failures.

pub mod admin;
pub mod config;
pub mod employees;
pub mod external;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
