//! External service integration.
//!
//! # Data Flow
//! ```text
//! HTTP handler (fetch by query / forward by employee id)
//!     → adapter.rs (Employee → wire payload)
//!     → gateway.rs (breaker admission, retry loop, outcome feedback)
//!     → transport.rs (timed reqwest call)
//!     → resilience::timeouts (classification)
//! ```

pub mod adapter;
pub mod gateway;
pub mod transport;

pub use adapter::ExternalEmployee;
pub use gateway::ExternalGateway;
pub use transport::{HttpTransport, OutboundRequest, Transport};
