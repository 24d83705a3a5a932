//! Tests for span pipeline selection.

use super::*;

#[test]
fn test_noop_tracer_is_inactive() {
    let tracer = NoopTracer;

    assert_eq!(tracer.name(), "noop");
    assert!(!tracer.is_active());
}

#[test]
fn test_noop_tracer_shutdown_is_infallible() {
    let tracer = NoopTracer;

    assert!(tracer.shutdown().is_ok());
}

#[test]
fn test_otlp_tracer_is_active() {
    // A provider without an exporter is enough to exercise the reporter
    // surface; no collector needs to be reachable.
    let provider = SdkTracerProvider::builder().build();
    let tracer = OtlpTracer { provider };

    assert_eq!(tracer.name(), "otlp");
    assert!(tracer.is_active());
}

#[test]
fn test_otlp_tracer_shutdown_flushes_provider() {
    let provider = SdkTracerProvider::builder().build();
    let tracer = OtlpTracer { provider };

    assert!(tracer.shutdown().is_ok());
}

#[test]
fn test_telemetry_config_carries_build_version() {
    let config = TelemetryConfig::new("TEKTON_101".to_string(), true);

    assert_eq!(config.service_name, "TEKTON_101");
    assert_eq!(config.service_version, env!("CARGO_PKG_VERSION"));
    assert!(config.enabled);
}

#[test]
fn test_telemetry_config_disabled_by_default_flag() {
    let config = TelemetryConfig::new("TEKTON_101".to_string(), false);

    assert!(!config.enabled);
}
