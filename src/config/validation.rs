//! Configuration validation.
//!
//! Serde handles syntax; this pass checks value ranges and URLs. All problems are
//! reported at once rather than stopping at the first.

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("external.base_url '{url}' is not a valid http(s) URL: {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("external.name must not be empty")]
    EmptyEndpointName,

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("circuit_breaker.failure_rate_threshold must be in (0, 1], got {0}")]
    Threshold(f64),

    #[error("circuit_breaker.minimum_calls ({minimum}) exceeds window_size ({window})")]
    MinimumExceedsWindow { minimum: usize, window: usize },

    #[error("retries.max_delay_ms ({max}) is below base_delay_ms ({base})")]
    DelayCap { base: u64, max: u64 },
}

/// Validate a parsed configuration, returning every error found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config
        .listener
        .bind_address
        .parse::<std::net::SocketAddr>()
        .is_err()
    {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.external.name.trim().is_empty() {
        errors.push(ValidationError::EmptyEndpointName);
    }

    match Url::parse(&config.external.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::BaseUrl {
            url: config.external.base_url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::BaseUrl {
            url: config.external.base_url.clone(),
            reason: e.to_string(),
        }),
    }

    let positives = [
        ("timeouts.connect_ms", config.timeouts.connect_ms),
        ("timeouts.response_ms", config.timeouts.response_ms),
        ("retries.max_attempts", u64::from(config.retries.max_attempts)),
        ("circuit_breaker.window_size", config.circuit_breaker.window_size as u64),
        ("circuit_breaker.minimum_calls", config.circuit_breaker.minimum_calls as u64),
        ("circuit_breaker.cooldown_ms", config.circuit_breaker.cooldown_ms),
        ("listener.request_timeout_secs", config.listener.request_timeout_secs),
    ];
    for (field, value) in positives {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }

    let threshold = config.circuit_breaker.failure_rate_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        errors.push(ValidationError::Threshold(threshold));
    }

    let cb = &config.circuit_breaker;
    if cb.minimum_calls > cb.window_size {
        errors.push(ValidationError::MinimumExceedsWindow {
            minimum: cb.minimum_calls,
            window: cb.window_size,
        });
    }

    if config.retries.max_delay_ms < config.retries.base_delay_ms {
        errors.push(ValidationError::DelayCap {
            base: config.retries.base_delay_ms,
            max: config.retries.max_delay_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
