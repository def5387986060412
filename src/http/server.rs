//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router serving the bridge
//! - Wire up middleware (timeout, body limit, request ID, tracing)
//! - Bind server to listener with graceful shutdown
//! - Record per-request metrics

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AdapterConfig;
use crate::http::bridge::bridge;
use crate::http::error::BridgeError;
use crate::invoker::Invoker;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub invoker: Arc<dyn Invoker>,
}

/// HTTP front of the adapter.
pub struct HttpServer {
    router: Router,
    config: AdapterConfig,
}

impl HttpServer {
    /// Create a new HTTP server bridging to `invoker`.
    pub fn new(config: AdapterConfig, invoker: Arc<dyn Invoker>) -> Self {
        let router = Self::build_router(&config, AppState { invoker });
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Every path is routed to the bridge, which answers anything but
    /// `POST /` itself.
    #[allow(deprecated)]
    fn build_router(config: &AdapterConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(invoke_handler))
            .route("/{*path}", any(invoke_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// The fully layered router, for serving without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
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
            backend = %self.config.backend.address,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }
}

/// Bridge one HTTP request to the invoker.
async fn invoke_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Bridging request"
    );

    let response = match bridge(state.invoker.as_ref(), request).await {
        Ok(response) => response,
        Err(err) => {
            log_failure(&request_id, &err);
            err.into_response()
        }
    };

    metrics::record_request(&method, response.status().as_u16(), start_time);
    response
}

fn log_failure(request_id: &str, err: &BridgeError) {
    match err {
        BridgeError::NotImplemented { .. } => {
            tracing::debug!(request_id = %request_id, error = %err, "Rejected request");
        }
        BridgeError::Body(_) => {
            tracing::error!(request_id = %request_id, error = %err, "Request body unreadable");
        }
        BridgeError::PayloadTooLarge => {
            tracing::debug!(request_id = %request_id, error = %err, "Rejected oversized body");
        }
        BridgeError::Invoker(status) => {
            metrics::record_invoker_error(status.code());
            tracing::warn!(
                request_id = %request_id,
                code = ?status.code(),
                http_status = %err.status_code(),
                error = %err,
                "Invocation failed"
            );
        }
    }
}
