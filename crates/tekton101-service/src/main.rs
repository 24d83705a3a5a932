//! # tekton101 Service
//!
//! Binary entry point for the tekton101 demonstration HTTP service.
//!
//! This executable:
//! - Loads configuration from environment variables
//! - Initializes observability (logging, metrics, tracing)
//! - Starts the HTTP server from tekton101-api
//!
//! Behavior is entirely environment-driven; the process takes no arguments.
//! Chain instances by pointing `TEKTON_101_ENV_BACKEND_SERVICE` of one
//! instance at the `/info` endpoint of another.

use tekton101_api::{start_server, telemetry, ServiceConfig, ServiceError, TelemetryConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // -------------------------------------------------------------------------
    // Load configuration
    //
    // Every recognized environment variable carries a documented default, so
    // an entirely unconfigured environment produces a valid service config.
    // A variable that is present but cannot be coerced to the correct type
    // IS a hard error because it indicates deliberate-but-broken operator
    // configuration. No logging subscriber exists yet at this point, so
    // failures go to stderr directly.
    // -------------------------------------------------------------------------
    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration, aborting: {e}");
            std::process::exit(3);
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Service configuration is invalid, aborting: {e}");
        std::process::exit(3);
    }

    // -------------------------------------------------------------------------
    // Initialize observability
    //
    // The span pipeline is selected exactly once: a no-op reporter when
    // tracing is disabled (the default), an OTLP exporter otherwise. The
    // logging subscriber is installed as part of the same call, so all
    // tracing output below this point is structured.
    // -------------------------------------------------------------------------
    let telemetry_config =
        TelemetryConfig::new(config.service_name.clone(), config.tracing_enabled);

    let reporter = match telemetry::init(&telemetry_config) {
        Ok(reporter) => reporter,
        Err(e) => {
            eprintln!("Failed to initialize telemetry, aborting: {e}");
            std::process::exit(4);
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        tracer = reporter.name(),
        "Starting tekton101 service"
    );

    info!(
        service_name = %config.service_name,
        example_value = %config.example_value,
        processing_delay_ms = config.processing_delay_ms,
        backend_url = config.backend_url.as_deref().unwrap_or(""),
        backend_delay_ms = config.backend_delay_ms,
        tracing_enabled = config.tracing_enabled,
        host = %config.server.host,
        port = config.server.port,
        "Resolved configuration"
    );

    if let Err(e) = start_server(config).await {
        error!("Failed to start server: {}", e);

        let exit_code = match e {
            ServiceError::BindFailed { .. } => 1,
            ServiceError::ServerFailed { .. } => 2,
            ServiceError::Configuration(_) => 3,
        };

        // Flush whatever spans made it out before aborting.
        if let Err(shutdown_error) = reporter.shutdown() {
            error!("Failed to shut down tracing: {}", shutdown_error);
        }

        std::process::exit(exit_code);
    }

    if let Err(e) = reporter.shutdown() {
        error!("Failed to shut down tracing: {}", e);
    }
}
