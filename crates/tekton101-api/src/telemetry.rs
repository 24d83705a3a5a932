//! Tracing pipeline selection and initialization
//!
//! The service either runs with a no-op span pipeline (the default) or with
//! an OTLP exporter feeding a tracing backend. The choice is made exactly
//! once at startup, before the HTTP listener binds; when tracing is disabled
//! no OpenTelemetry global state is touched and no backend needs to be
//! reachable.

use crate::errors::TelemetryError;
use opentelemetry::{global, trace::TracerProvider as _, KeyValue};
use opentelemetry_sdk::{trace::SdkTracerProvider, Resource};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Resource attribute carrying the build version on every exported span.
const VERSION_ATTRIBUTE: &str = "tekton101.version";

/// Settings for the span pipeline
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name reported as the tracing service identity
    pub service_name: String,

    /// Service version attached to every span
    pub service_version: String,

    /// Whether spans are exported at all
    pub enabled: bool,
}

impl TelemetryConfig {
    pub fn new(service_name: String, enabled: bool) -> Self {
        Self {
            service_name,
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            enabled,
        }
    }
}

/// Abstraction over the span pipeline so the rest of the service never needs
/// to know whether tracing is enabled.
pub trait TraceReporter: Send + Sync {
    /// Short name used in startup logging.
    fn name(&self) -> &'static str;

    /// Whether spans are exported anywhere.
    fn is_active(&self) -> bool;

    /// Flush pending spans and tear down the pipeline.
    fn shutdown(&self) -> Result<(), TelemetryError>;
}

/// Span pipeline used when tracing is disabled. Does nothing and holds no
/// OpenTelemetry state.
pub struct NoopTracer;

impl TraceReporter for NoopTracer {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn is_active(&self) -> bool {
        false
    }

    fn shutdown(&self) -> Result<(), TelemetryError> {
        Ok(())
    }
}

/// Span pipeline exporting to an OTLP collector.
pub struct OtlpTracer {
    provider: SdkTracerProvider,
}

impl TraceReporter for OtlpTracer {
    fn name(&self) -> &'static str {
        "otlp"
    }

    fn is_active(&self) -> bool {
        true
    }

    fn shutdown(&self) -> Result<(), TelemetryError> {
        self.provider
            .shutdown()
            .map_err(|e| TelemetryError::Shutdown {
                message: e.to_string(),
            })
    }
}

/// Initialize logging and, when enabled, the OTLP span pipeline.
///
/// Must be called exactly once, before the HTTP listener starts. The exporter
/// endpoint follows the standard `OTEL_EXPORTER_OTLP_*` environment
/// variables.
pub fn init(config: &TelemetryConfig) -> Result<Box<dyn TraceReporter>, TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tekton101_service=info,tekton101_api=info,tower_http=info".into());

    if !config.enabled {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| TelemetryError::Init {
                message: e.to_string(),
            })?;

        return Ok(Box::new(NoopTracer));
    }

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()
        .map_err(|e| TelemetryError::Init {
            message: e.to_string(),
        })?;

    let resource = Resource::builder()
        .with_service_name(config.service_name.clone())
        .with_attribute(KeyValue::new(
            VERSION_ATTRIBUTE,
            config.service_version.clone(),
        ))
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build();

    let tracer = provider.tracer("tekton101");
    global::set_tracer_provider(provider.clone());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init()
        .map_err(|e| TelemetryError::Init {
            message: e.to_string(),
        })?;

    info!(
        service_name = %config.service_name,
        "tracing enabled, OTLP span pipeline initialized"
    );

    Ok(Box::new(OtlpTracer { provider }))
}

#[cfg(test)]
#[path = "telemetry_tests.rs"]
mod tests;
