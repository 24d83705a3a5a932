//! Configuration types for the HTTP service
//!
//! All configuration comes from environment variables read exactly once at
//! process start. The resulting [`ServiceConfig`] is immutable for the
//! process lifetime; request handlers only ever see the snapshot.

use crate::errors::ConfigError;
use serde::Serialize;
use std::str::FromStr;
use std::time::Duration;

/// Service/display name, also used as the tracing service identity.
pub const ENV_SERVICE_NAME: &str = "TEKTON_101_ENV_NAME";

/// Arbitrary value echoed verbatim in `/info` responses.
pub const ENV_EXAMPLE_VALUE: &str = "TEKTON_101_ENV_EXAMPLE";

/// Milliseconds to delay request processing before any backend interaction.
pub const ENV_PROCESSING_DELAY: &str = "TEKTON_101_ENV_DELAY";

/// Complete URL of the downstream backend service. Absent or empty means no
/// backend call is attempted.
pub const ENV_BACKEND_URL: &str = "TEKTON_101_ENV_BACKEND_SERVICE";

/// Milliseconds to delay immediately before the backend call.
pub const ENV_BACKEND_DELAY: &str = "TEKTON_101_ENV_BACKEND_SERVICE_DELAY";

/// Gates whether the tracing pipeline is initialized at all.
pub const ENV_TRACING_ENABLED: &str = "TEKTON_101_ENV_TRACING_ENABLED";

/// Listen port.
pub const ENV_PORT: &str = "PORT";

/// Listen address.
pub const ENV_IP: &str = "IP";

/// Service configuration
#[derive(Debug, Clone, Serialize)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Service/display name, alphanumeric only
    pub service_name: String,

    /// Example value echoed in responses
    pub example_value: String,

    /// Simulated processing delay in milliseconds
    pub processing_delay_ms: u64,

    /// Backend service URL; `None` means no backend call is made
    pub backend_url: Option<String>,

    /// Delay before the backend call in milliseconds
    pub backend_delay_ms: u64,

    /// Whether the tracing pipeline is initialized
    pub tracing_enabled: bool,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            service_name: "TEKTON_101".to_string(),
            example_value: "default value".to_string(),
            processing_delay_ms: 1000,
            backend_url: None,
            backend_delay_ms: 0,
            tracing_enabled: false,
        }
    }
}

impl ServiceConfig {
    /// Build the configuration snapshot from the process environment.
    ///
    /// Absent or empty variables resolve to their documented defaults. A
    /// variable that is present but not parseable as its expected type is a
    /// hard error so the process can abort at startup rather than run with
    /// surprising timings.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig {
                host: env_or(ENV_IP, "0.0.0.0"),
                port: env_parse(ENV_PORT, 5000)?,
            },
            service_name: env_or(ENV_SERVICE_NAME, "TEKTON_101"),
            example_value: env_or(ENV_EXAMPLE_VALUE, "default value"),
            processing_delay_ms: env_parse(ENV_PROCESSING_DELAY, 1000)?,
            backend_url: match env_or(ENV_BACKEND_URL, "") {
                url if url.is_empty() => None,
                url => Some(url),
            },
            backend_delay_ms: env_parse(ENV_BACKEND_DELAY, 0)?,
            tracing_enabled: env_flag(ENV_TRACING_ENABLED),
        })
    }

    /// Validate invariants that hold beyond simple type coercion.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty()
            || !self
                .service_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigError::InvalidServiceName {
                value: self.service_name.clone(),
            });
        }
        Ok(())
    }

    /// Simulated processing delay applied to every `/info` request.
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    /// Delay applied immediately before the backend call.
    pub fn backend_delay(&self) -> Duration {
        Duration::from_millis(self.backend_delay_ms)
    }
}

/// Read a string variable, treating absent and empty values as the default.
fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Read and parse a numeric variable, failing fast on malformed input.
fn env_parse<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) if !raw.is_empty() => {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber {
                    name: name.to_string(),
                    value: raw,
                })
        }
        _ => Ok(default),
    }
}

/// Read a boolean flag. Only explicit affirmative spellings enable the flag;
/// everything else (including absence) is `false`.
fn env_flag(name: &str) -> bool {
    matches!(
        env_or(name, "").to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
