//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the employee service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, limits).
    pub listener: ListenerConfig,

    /// External service the gateway talks to.
    pub external: ExternalServiceConfig,

    /// Per-attempt deadlines for outbound calls.
    pub timeouts: TimeoutConfig,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Circuit breaker configuration.
    pub circuit_breaker: CircuitBreakerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Employee record rules.
    pub employees: EmployeeConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Upper bound for a whole inbound request, retries included.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// External HTTP service definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExternalServiceConfig {
    /// Endpoint name; keys the circuit breaker and labels metrics.
    pub name: String,

    /// Base URL. GET calls append the query verbatim, POST calls target it as-is.
    pub base_url: String,
}

impl Default for ExternalServiceConfig {
    fn default() -> Self {
        Self {
            name: "external-service".to_string(),
            base_url: "http://localhost:9000/employees/".to_string(),
        }
    }
}

/// Deadlines applied to every outbound attempt.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment deadline in milliseconds.
    pub connect_ms: u64,

    /// Deadline for the response once connected, in milliseconds.
    pub response_ms: u64,
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    pub fn response(&self) -> Duration {
        Duration::from_millis(self.response_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: 3000,
            response_ms: 3000,
        }
    }
}

/// Delay strategy between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    Fixed,
    Exponential,
}

/// Failure kinds as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ConnectTimeout,
    ReadTimeout,
    Transport,
    BreakerOpen,
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per logical call, the first one included.
    pub max_attempts: u32,

    /// Fixed or exponential delay.
    pub backoff: BackoffStrategy,

    /// Base delay in milliseconds (the fixed delay for `fixed`).
    pub base_delay_ms: u64,

    /// Cap for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Add up to 10% random jitter to each delay.
    pub jitter: bool,

    /// Failure kinds worth another attempt. `breaker_open` is ignored here.
    pub retry_on: Vec<FailureKind>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffStrategy::Exponential,
            base_delay_ms: 100,
            max_delay_ms: 2000,
            jitter: true,
            retry_on: vec![
                FailureKind::ConnectTimeout,
                FailureKind::ReadTimeout,
                FailureKind::Transport,
            ],
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Failure ratio (0.0, 1.0] at which the circuit opens.
    pub failure_rate_threshold: f64,

    /// Number of most recent outcomes kept in the rolling window.
    pub window_size: usize,

    /// Samples required before the ratio is evaluated.
    pub minimum_calls: usize,

    /// Time spent Open before a probe is allowed, in milliseconds.
    pub cooldown_ms: u64,
}

impl CircuitBreakerConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_rate_threshold: 0.5,
            window_size: 10,
            minimum_calls: 5,
            cooldown_ms: 10_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Employee record rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmployeeConfig {
    /// Mail domain new employees must belong to.
    pub company_email_domain: String,
}

impl Default for EmployeeConfig {
    fn default() -> Self {
        Self {
            company_email_domain: "company.com".to_string(),
        }
    }
}
