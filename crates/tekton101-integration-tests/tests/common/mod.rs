//! Common utilities for tekton101 integration tests
//!
//! These helpers serve the real router over a loopback TCP listener and make
//! plain HTTP requests against it, so tests exercise the same path a chained
//! instance or an operator's curl would.

use std::sync::{Arc, OnceLock};
use tekton101_api::{create_router, AppState, BackendClient, ServiceConfig, ServiceMetrics};

/// Handle to an in-process server bound to an ephemeral loopback port.
pub struct TestApp {
    pub base_url: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Returns the shared [`ServiceMetrics`] instance for this test binary.
///
/// Prometheus registers metrics with a global registry that rejects duplicate
/// registrations, so every spawned app in one binary shares one instance.
pub fn shared_metrics() -> Arc<ServiceMetrics> {
    static METRICS: OnceLock<Arc<ServiceMetrics>> = OnceLock::new();
    METRICS
        .get_or_init(|| ServiceMetrics::new().expect("ServiceMetrics::new must succeed in tests"))
        .clone()
}

/// Serve the router for `config` on an ephemeral port and return its address.
pub async fn spawn_app(config: ServiceConfig) -> TestApp {
    let state = AppState::new(config, Arc::new(BackendClient::new()), shared_metrics());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral loopback bind must succeed");
    let addr = listener.local_addr().expect("listener has a local address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("test server must not fail");
    });

    TestApp {
        base_url: format!("http://{}", addr),
    }
}

/// Configuration with delays short enough for fast tests.
pub fn fast_config() -> ServiceConfig {
    ServiceConfig {
        processing_delay_ms: 10,
        backend_delay_ms: 0,
        ..ServiceConfig::default()
    }
}

/// The greeting line for the default configuration.
#[allow(dead_code)]
pub const DEFAULT_GREETING: &str =
    "[TEKTON_101]: Hello from NodeJS Playground! TEKTON_101_ENV_EXAMPLE=default value";
