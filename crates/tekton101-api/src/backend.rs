//! Outbound HTTP client for the configured backend service
//!
//! One GET per `/info` request, no retries, no timeout override. Failures are
//! captured as data and surfaced in the response body rather than propagated.

use tracing::{info, instrument, warn};

/// Result of a single backend call.
///
/// Any received response is a `Success` regardless of its HTTP status code;
/// only transport-level failures (DNS, connection refused, unreachable host,
/// interrupted body) produce a `Failure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendOutcome {
    /// The backend responded; carries the raw response body.
    Success(String),

    /// The call failed at the transport level; carries a human-readable
    /// error message.
    Failure(String),
}

impl BackendOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// HTTP client for the single configured downstream service.
///
/// Holds one [`reqwest::Client`] so connection pooling is shared across
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Issue a single HTTP GET to `url` and capture the outcome.
    ///
    /// The numeric status code is logged for every received response. No
    /// error escapes this method.
    #[instrument(skip(self))]
    pub async fn call(&self, url: &str) -> BackendOutcome {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                info!(status = status.as_u16(), "Backend service responded");

                match response.text().await {
                    Ok(body) => BackendOutcome::Success(body),
                    Err(e) => {
                        warn!(error = %e, "Failed to read backend response body");
                        BackendOutcome::Failure(e.to_string())
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Backend service call failed");
                BackendOutcome::Failure(e.to_string())
            }
        }
    }
}

impl Default for BackendClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
