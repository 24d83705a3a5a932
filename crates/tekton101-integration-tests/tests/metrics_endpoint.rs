//! Integration tests for the Prometheus metrics exposition.

mod common;

use common::{fast_config, spawn_app};

/// Extract the counter value for a `(method, path)` pair from the text
/// exposition, if present.
fn counter_value(exposition: &str, name: &str, method: &str, path: &str) -> Option<f64> {
    exposition
        .lines()
        .find(|line| {
            line.starts_with(&format!("{name}{{"))
                && line.contains(&format!(r#"method="{method}""#))
                && line.contains(&format!(r#"path="{path}""#))
        })
        .and_then(|line| line.split_whitespace().last())
        .and_then(|value| value.parse().ok())
}

#[tokio::test]
async fn test_request_counter_reflects_info_request_volume() {
    // Arrange
    let app = spawn_app(fast_config()).await;
    let client = reqwest::Client::new();
    let request_count = 5;

    // Act
    for _ in 0..request_count {
        let response = client.get(app.url("/info")).send().await.unwrap();
        assert_eq!(response.status(), 200);
    }

    let exposition = client
        .get(app.url("/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    // Assert: the registry is process-global and shared across tests in this
    // binary, so the counter is a lower bound rather than an exact count.
    let counted = counter_value(&exposition, "http_requests_total", "GET", "/info")
        .expect("exposition must contain a GET /info counter");
    assert!(
        counted >= request_count as f64,
        "expected at least {request_count} GET /info requests, exposition reports {counted}"
    );
}

#[tokio::test]
async fn test_exposition_is_prometheus_text_format() {
    // Arrange: a labeled vec emits no HELP/TYPE lines until it has at least
    // one child, so drive one request before scraping.
    let app = spawn_app(fast_config()).await;
    let health = reqwest::get(app.url("/health")).await.unwrap();
    assert_eq!(health.status(), 200);

    // Act
    let response = reqwest::get(app.url("/metrics")).await.unwrap();

    // Assert
    assert_eq!(response.status(), 200);
    let exposition = response.text().await.unwrap();
    assert!(
        exposition.contains("# HELP http_requests_total"),
        "exposition must carry HELP comments"
    );
    assert!(
        exposition.contains("# TYPE http_requests_total counter"),
        "exposition must carry TYPE comments"
    );
}

#[tokio::test]
async fn test_metrics_endpoint_does_not_alter_info_responses() {
    // Arrange
    let app = spawn_app(fast_config()).await;
    let client = reqwest::Client::new();

    // Act: interleave metrics scrapes with info requests.
    let info_before = client.get(app.url("/info")).send().await.unwrap();
    let _ = client.get(app.url("/metrics")).send().await.unwrap();
    let info_after = client.get(app.url("/info")).send().await.unwrap();

    // Assert: observation is pass-through only.
    let body_before = info_before.text().await.unwrap();
    let body_after = info_after.text().await.unwrap();
    assert_eq!(body_before, body_after);
}
