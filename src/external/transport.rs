//! Outbound HTTP transport.
//!
//! # Responsibilities
//! - Issue one GET or POST against the external service
//! - Enforce the connect deadline and the response deadline (both on the client)
//! - Report failures as `TransportFault`s for the classifier
//!
//! # Design Decisions
//! - One pooled `reqwest::Client` per transport
//! - The response deadline is a read timeout, measured once the connection is up and
//!   the request written, so a slow connect always surfaces as a connect timeout
//! - A Tokio deadline of connect + response bounds the whole exchange, catching a
//!   body that trickles in under the read timeout
//! - Non-2xx responses are failures; their body is never returned

use reqwest::header::CONTENT_TYPE;
use std::future::Future;
use std::time::Duration;

use crate::config::TimeoutConfig;
use crate::resilience::timeouts::{with_response_deadline, TransportFault};

/// A single outbound call, fixed before the first attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundRequest {
    Get { url: String },
    Post { url: String, body: String },
}

impl OutboundRequest {
    pub fn method(&self) -> &'static str {
        match self {
            OutboundRequest::Get { .. } => "GET",
            OutboundRequest::Post { .. } => "POST",
        }
    }

    pub fn url(&self) -> &str {
        match self {
            OutboundRequest::Get { url } | OutboundRequest::Post { url, .. } => url,
        }
    }
}

/// Something that can carry an `OutboundRequest` to the external service.
pub trait Transport: Send + Sync {
    fn send(&self, request: &OutboundRequest) -> impl Future<Output = Result<String, TransportFault>> + Send;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    connect_timeout: Duration,
    response_timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeouts.connect())
            .read_timeout(timeouts.response())
            .no_proxy()
            .build()?;
        Ok(Self {
            client,
            connect_timeout: timeouts.connect(),
            response_timeout: timeouts.response(),
        })
    }

    /// Read timeouts carry the configured response budget.
    fn fault(&self, err: reqwest::Error) -> TransportFault {
        match TransportFault::from(err) {
            TransportFault::ResponseDeadline(_) => TransportFault::ResponseDeadline(self.response_timeout),
            other => other,
        }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<String, TransportFault> {
        let builder = match request {
            OutboundRequest::Get { url } => self.client.get(url),
            OutboundRequest::Post { url, body } => self
                .client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone()),
        };

        let exchange = async {
            let response = builder
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| self.fault(e))?;
            response.text().await.map_err(|e| self.fault(e))
        };

        with_response_deadline(self.connect_timeout + self.response_timeout, exchange).await
    }
}
