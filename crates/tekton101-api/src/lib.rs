//! # tekton101 HTTP Service
//!
//! HTTP server for the tekton101 demonstration microservice.
//!
//! This service provides:
//! - `/info` endpoint that delays, optionally calls one configured backend
//!   service, and echoes the result
//! - `/metrics` Prometheus text exposition
//! - `/health` liveness endpoint
//!
//! Instances chain to each other: any running instance can be configured as
//! the backend service of the next one, which makes the tracing and metrics
//! behavior of a synthetic call graph easy to explore.

// Public modules
pub mod backend;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod telemetry;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

pub use backend::{BackendClient, BackendOutcome};
pub use config::{ServerConfig, ServiceConfig};
pub use errors::{ConfigError, ServiceError, TelemetryError};
pub use metrics::ServiceMetrics;
pub use telemetry::{NoopTracer, OtlpTracer, TelemetryConfig, TraceReporter};

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{Json, Response},
    routing::get,
    Router,
};
use prometheus::TextEncoder;
use serde::Serialize;
use std::sync::Arc;
use tokio::time::sleep;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, instrument, warn};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
///
/// The configuration snapshot is immutable after startup; every request sees
/// the same values, so concurrent reads need no synchronization.
#[derive(Clone)]
pub struct AppState {
    /// Configuration for the service
    pub config: ServiceConfig,

    /// Outbound client for the configured backend service
    pub backend: Arc<BackendClient>,

    /// Metrics collector for observability
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        config: ServiceConfig,
        backend: Arc<BackendClient>,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            config,
            backend,
            metrics,
        }
    }
}

// ============================================================================
// HTTP Server
// ============================================================================

/// Create HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/info", get(handle_info))
        .route("/health", get(handle_health_check))
        .route("/metrics", get(metrics_endpoint))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_logging_middleware))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .into_inner(),
        )
        .with_state(state)
}

/// Start HTTP server
pub async fn start_server(config: ServiceConfig) -> Result<(), ServiceError> {
    let metrics = ServiceMetrics::new().map_err(|e| {
        ServiceError::Configuration(ConfigError::Invalid {
            message: format!("Failed to initialize metrics: {}", e),
        })
    })?;

    let backend = Arc::new(BackendClient::new());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, backend, metrics);
    let app = create_router(state);

    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| ServiceError::BindFailed {
                address: addr.clone(),
                message: e.to_string(),
            })?;

    info!("Starting HTTP server on {}", addr);

    let shutdown_signal = async {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C signal handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
            },
            _ = terminate => {
                info!("Received SIGTERM, initiating graceful shutdown");
            },
        }
    };

    // In-flight requests (including ones parked on their processing delay)
    // complete before the server exits; new connections are refused as soon
    // as the signal arrives.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ServiceError::ServerFailed {
            message: e.to_string(),
        })?;

    info!("HTTP server shutdown complete");
    Ok(())
}

// ============================================================================
// Request Handlers
// ============================================================================

/// Handle the informational endpoint
///
/// Per-request flow: build the greeting line, wait for the configured
/// processing delay, then (only when a backend URL is configured) wait for
/// the backend delay and perform one outbound GET, appending its body or its
/// failure message to the response.
///
/// The upstream NodeJS original never answered when no backend was
/// configured, leaving the client hanging forever. That was a defect rather
/// than a contract; this implementation always responds with the greeting
/// line.
#[instrument(skip(state), fields(service = %state.config.service_name))]
async fn handle_info(State(state): State<AppState>) -> String {
    let mut accumulator = format!(
        "[{}]: Hello from NodeJS Playground! TEKTON_101_ENV_EXAMPLE={}",
        state.config.service_name, state.config.example_value
    );

    // simulated processing
    sleep(state.config.processing_delay()).await;

    if let Some(backend_url) = &state.config.backend_url {
        sleep(state.config.backend_delay()).await;

        let started = std::time::Instant::now();
        let outcome = state.backend.call(backend_url).await;
        state
            .metrics
            .record_backend_request(started.elapsed(), outcome.is_success());

        match outcome {
            BackendOutcome::Success(body) => {
                accumulator.push('\n');
                accumulator.push_str(&body);
            }
            BackendOutcome::Failure(message) => {
                accumulator.push_str("\nBackendService Failed: ");
                accumulator.push_str(&message);
            }
        }
    }

    accumulator
}

/// Basic health check endpoint
#[instrument(skip_all)]
async fn handle_health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Prometheus metrics endpoint
#[instrument(skip_all)]
async fn metrics_endpoint(State(_state): State<AppState>) -> Result<String, StatusCode> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder
        .encode_to_string(&metric_families)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

// ============================================================================
// Middleware
// ============================================================================

/// Request logging middleware with correlation ID tracking
///
/// This middleware:
/// - Extracts or generates correlation IDs for request tracking
/// - Logs request start and completion with structured fields
/// - Propagates the correlation ID through response headers
#[instrument(skip(request, next), fields(
    method = %request.method(),
    uri = %request.uri(),
    correlation_id
))]
async fn request_logging_middleware(
    mut request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    // Extract or generate correlation ID
    let correlation_id = request
        .headers()
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::Span::current().record("correlation_id", correlation_id.as_str());

    // Make the correlation ID available to downstream handlers
    request.extensions_mut().insert(correlation_id.clone());

    let mut response = next.run(request).await;
    let duration = start.elapsed();

    if let Ok(header_value) = correlation_id.parse() {
        response
            .headers_mut()
            .insert("x-correlation-id", header_value);
    }

    let status = response.status();

    // Log at appropriate level based on status code
    if status.is_server_error() {
        error!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        warn!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with client error"
        );
    } else {
        info!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed successfully"
        );
    }

    response
}

/// Metrics collection middleware
///
/// Records a request counter and a latency observation per `(method, path)`
/// pair for every inbound request. Pass-through only: handler behavior and
/// response bodies are never altered.
async fn metrics_middleware(
    State(state): State<AppState>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let start = std::time::Instant::now();
    let method = request.method().to_string();
    let uri = request.uri().path().to_string();

    // Normalize path for metrics (remove IDs, keep structure)
    // This prevents cardinality explosion in metrics
    let normalized_path = normalize_path_for_metrics(&uri);

    let response = next.run(request).await;

    state
        .metrics
        .record_http_request(&method, &normalized_path, start.elapsed());

    response
}

/// Check if a string looks like a UUID with proper 8-4-4-4-12 hyphen pattern
fn is_uuid_like(s: &str) -> bool {
    if s.len() != 36 {
        return false;
    }

    let chars: Vec<char> = s.chars().collect();

    if chars[8] != '-' || chars[13] != '-' || chars[18] != '-' || chars[23] != '-' {
        return false;
    }

    for (i, ch) in chars.iter().enumerate() {
        if i == 8 || i == 13 || i == 18 || i == 23 {
            continue;
        }
        if !ch.is_ascii_hexdigit() {
            return false;
        }
    }

    true
}

/// Normalize path for metrics to avoid cardinality explosion
///
/// Converts paths like `/info/12345` to `/info/:id`
fn normalize_path_for_metrics(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let normalized: Vec<String> = segments
        .iter()
        .map(|segment| {
            if segment.is_empty() {
                segment.to_string()
            } else if segment.chars().all(|c| c.is_ascii_digit()) {
                ":id".to_string()
            } else if is_uuid_like(segment) {
                ":id".to_string()
            } else {
                segment.to_string()
            }
        })
        .collect();

    normalized.join("/")
}

// ============================================================================
// Response Types
// ============================================================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
