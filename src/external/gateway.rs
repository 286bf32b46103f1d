//! External gateway: breaker-guarded, retried calls to the external service.
//!
//! Each attempt runs the same explicit sequence:
//! ```text
//! breaker.try_acquire() → transport.send() → classify() → permit.record() → retry decision
//! ```

use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::external::adapter::ExternalEmployee;
use crate::external::transport::{HttpTransport, OutboundRequest, Transport};
use crate::observability::metrics;
use crate::resilience::{classify, BreakerRegistry, CallError, CallOutcome, CircuitBreaker, RetryPolicy};

/// Gateway to one external endpoint.
#[derive(Debug)]
pub struct ExternalGateway<T = HttpTransport> {
    endpoint: String,
    base_url: String,
    breaker: Arc<CircuitBreaker>,
    retry: RetryPolicy,
    transport: T,
}

impl ExternalGateway<HttpTransport> {
    /// Build the production gateway, registering its breaker in `registry`.
    pub fn from_config(config: &AppConfig, registry: &BreakerRegistry) -> Result<Self, reqwest::Error> {
        let transport = HttpTransport::new(&config.timeouts)?;
        let breaker = registry.get_or_create(&config.external.name, &config.circuit_breaker);
        Ok(Self::new(
            &config.external.base_url,
            breaker,
            RetryPolicy::from_config(&config.retries),
            transport,
        ))
    }
}

impl<T: Transport> ExternalGateway<T> {
    pub fn new(base_url: &str, breaker: Arc<CircuitBreaker>, retry: RetryPolicy, transport: T) -> Self {
        Self {
            endpoint: breaker.name().to_string(),
            base_url: base_url.to_string(),
            breaker,
            retry,
            transport,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    /// `GET {base_url}{query}`.
    pub async fn fetch(&self, query: &str) -> Result<String, CallError> {
        let request = OutboundRequest::Get {
            url: format!("{}{}", self.base_url, query),
        };
        self.execute("fetch", request).await
    }

    /// `POST {base_url}` with the record as JSON.
    pub async fn forward(&self, record: &ExternalEmployee) -> Result<String, CallError> {
        let body = serde_json::to_string(record)
            .map_err(|e| CallError::Transport(format!("failed to encode record: {e}")))?;
        let request = OutboundRequest::Post {
            url: self.base_url.clone(),
            body,
        };
        self.execute("forward", request).await
    }

    async fn execute(&self, operation: &'static str, request: OutboundRequest) -> Result<String, CallError> {
        let result = self
            .retry
            .execute(|attempt| self.attempt(operation, &request, attempt))
            .await;
        if let Err(ref error) = result {
            tracing::warn!(
                endpoint = %self.endpoint,
                operation,
                method = request.method(),
                url = request.url(),
                error = %error,
                "External call failed"
            );
        }
        result
    }

    async fn attempt(&self, operation: &'static str, request: &OutboundRequest, attempt: u32) -> Result<String, CallError> {
        let permit = self.breaker.try_acquire()?;
        if attempt > 1 {
            metrics::record_retry(&self.endpoint, operation);
        }

        let start = Instant::now();
        let outcome = match self.transport.send(request).await {
            Ok(body) => CallOutcome::Success(body),
            Err(fault) => classify(fault),
        };
        permit.record(outcome.is_success());

        metrics::record_external_call(&self.endpoint, operation, outcome.label(), start);
        tracing::debug!(
            endpoint = %self.endpoint,
            operation,
            attempt,
            outcome = outcome.label(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "External attempt finished"
        );

        outcome.into_result()
    }
}
