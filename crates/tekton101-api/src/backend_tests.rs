//! Tests for [`BackendClient`] outcome capture.

use super::*;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_success_carries_raw_response_body() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello from downstream"))
        .mount(&server)
        .await;
    let client = BackendClient::new();

    // Act
    let outcome = client.call(&server.uri()).await;

    // Assert
    assert_eq!(
        outcome,
        BackendOutcome::Success("hello from downstream".to_string())
    );
}

#[tokio::test]
async fn test_http_error_status_is_still_success() {
    // Any received response counts as success; status codes are not
    // interpreted, only logged.
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream overloaded"))
        .mount(&server)
        .await;
    let client = BackendClient::new();

    let outcome = client.call(&server.uri()).await;

    assert_eq!(
        outcome,
        BackendOutcome::Success("upstream overloaded".to_string())
    );
}

#[tokio::test]
async fn test_empty_body_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    let client = BackendClient::new();

    let outcome = client.call(&server.uri()).await;

    assert_eq!(outcome, BackendOutcome::Success(String::new()));
}

#[tokio::test]
async fn test_connection_refused_is_failure_with_message() {
    // Port 9 on localhost is expected to refuse connections.
    let client = BackendClient::new();

    let outcome = client.call("http://127.0.0.1:9/info").await;

    match outcome {
        BackendOutcome::Failure(message) => {
            assert!(!message.is_empty(), "failure must carry a message");
        }
        BackendOutcome::Success(body) => {
            panic!("expected transport failure, got success with body: {body:?}");
        }
    }
}

#[test]
fn test_is_success_helper() {
    assert!(BackendOutcome::Success("ok".to_string()).is_success());
    assert!(!BackendOutcome::Failure("boom".to_string()).is_success());
}
