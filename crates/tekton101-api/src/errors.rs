//! Error types for the HTTP service

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Configuration errors
///
/// Malformed environment variables fail fast at startup: a value that is
/// present but cannot be coerced to its expected type is a
/// deliberate-but-broken operator configuration and aborts the process.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Environment variable {name} is not a valid number: {value}")]
    InvalidNumber { name: String, value: String },

    #[error("Service name must be non-empty and alphanumeric, got: {value:?}")]
    InvalidServiceName { value: String },
}

/// Telemetry pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing: {message}")]
    Init { message: String },

    #[error("Failed to shut down tracing: {message}")]
    Shutdown { message: String },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
