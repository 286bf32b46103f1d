//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the Axum router for the employee API and admin endpoints
//! - Wire up middleware (request id, tracing, timeout, body limit, request metrics)
//! - Serve on a listener until the shutdown broadcast fires

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::setup_admin_router;
use crate::config::AppConfig;
use crate::employees::{EmployeeService, EmployeeStore};
use crate::external::ExternalGateway;
use crate::http::employees::*;
use crate::http::external::{fetch_external, forward_external};
use crate::http::request::{propagate_request_id_layer, request_id_of, set_request_id_layer};
use crate::observability::metrics;
use crate::resilience::BreakerRegistry;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub employees: EmployeeService,
    pub gateway: Arc<ExternalGateway>,
    pub breakers: BreakerRegistry,
}

impl AppState {
    /// Fresh store, a breaker registry and the production gateway.
    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let breakers = BreakerRegistry::new();
        let gateway = ExternalGateway::from_config(config, &breakers)?;
        Ok(Self {
            employees: EmployeeService::new(
                EmployeeStore::new(),
                config.employees.company_email_domain.clone(),
            ),
            gateway: Arc::new(gateway),
            breakers,
        })
    }
}

/// HTTP server for the employee service.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let state = AppState::from_config(&config)?;
        Ok(Self::with_state(config, state))
    }

    pub fn with_state(config: AppConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/employees", get(list_employees).post(create_employee))
            .route(
                "/api/employees/{id}",
                get(get_employee).put(update_employee).delete(delete_employee),
            )
            .route("/api/employees/search/{name}", get(search_employees))
            .route("/api/employees/manager/{manager_id}", get(employees_by_manager))
            .route(
                "/api/employees/external/{key}",
                get(fetch_external).post(forward_external),
            )
            .merge(setup_admin_router())
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(
                        |request: &Request<Body>| {
                            tracing::info_span!(
                                "request",
                                method = %request.method(),
                                uri = %request.uri(),
                                request_id = %request_id_of(request),
                            )
                        },
                    ))
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.listener.request_timeout_secs,
                    )))
                    .layer(middleware::from_fn(track_requests))
                    .layer(RequestBodyLimitLayer::new(config.listener.max_body_size)),
            )
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            external_endpoint = %self.state.gateway.endpoint(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(request).await;
    metrics::record_request(method.as_str(), &route, response.status().as_u16());
    response
}
