//! Metrics collection and observability types for the API service.

use prometheus::{Histogram, HistogramVec, IntCounter, IntCounterVec};
use std::sync::Arc;

/// Service metrics for observability
///
/// Inbound HTTP metrics are keyed by `(method, path)`; outbound backend
/// metrics are plain counters/histograms since there is only one configured
/// backend. All metrics register with the prometheus default registry and
/// are served by the `/metrics` endpoint.
#[derive(Debug)]
pub struct ServiceMetrics {
    // HTTP request metrics
    pub http_requests_total: IntCounterVec,
    pub http_request_duration: HistogramVec,

    // Backend call metrics
    pub backend_requests_total: IntCounter,
    pub backend_failures_total: IntCounter,
    pub backend_request_duration: Histogram,
}

impl ServiceMetrics {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        use prometheus::{
            register_histogram, register_histogram_vec, register_int_counter,
            register_int_counter_vec,
        };

        Ok(Arc::new(Self {
            http_requests_total: register_int_counter_vec!(
                "http_requests_total",
                "Total number of HTTP requests",
                &["method", "path"]
            )?,
            http_request_duration: register_histogram_vec!(
                "http_request_duration_seconds",
                "HTTP request processing time",
                &["method", "path"],
                vec![0.001, 0.01, 0.1, 1.0, 10.0]
            )?,

            backend_requests_total: register_int_counter!(
                "backend_requests_total",
                "Total backend service calls attempted"
            )?,
            backend_failures_total: register_int_counter!(
                "backend_failures_total",
                "Backend service calls that failed with a transport error"
            )?,
            backend_request_duration: register_histogram!(
                "backend_request_duration_seconds",
                "Backend service call latency",
                vec![0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 5.0]
            )?,
        }))
    }

    pub fn record_http_request(&self, method: &str, path: &str, duration: std::time::Duration) {
        self.http_requests_total
            .with_label_values(&[method, path])
            .inc();
        self.http_request_duration
            .with_label_values(&[method, path])
            .observe(duration.as_secs_f64());
    }

    pub fn record_backend_request(&self, duration: std::time::Duration, success: bool) {
        self.backend_requests_total.inc();
        self.backend_request_duration
            .observe(duration.as_secs_f64());
        if !success {
            self.backend_failures_total.inc();
        }
    }
}

/// Returns a shared [`ServiceMetrics`] instance for tests.
///
/// Prometheus registers metrics with a global registry that rejects duplicate
/// registrations, so the instance is created exactly once per test-binary
/// invocation regardless of how many test modules call this helper.
#[cfg(test)]
pub(crate) fn shared_test_metrics() -> Arc<ServiceMetrics> {
    use std::sync::OnceLock;

    static METRICS: OnceLock<Arc<ServiceMetrics>> = OnceLock::new();
    METRICS
        .get_or_init(|| ServiceMetrics::new().expect("ServiceMetrics::new must succeed in tests"))
        .clone()
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
