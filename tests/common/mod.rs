//! Common test utilities for rikuesuto integration tests
//!
//! - Mock HTTP server setup using wiremock
//! - Running blocking client calls from async tests
//! - Tracing output routed to the test harness

#![allow(dead_code)]

use std::sync::Once;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Body returned by [`echo_ok`] mocks
pub const OK_BODY: &str = "OK";

static TRACING: Once = Once::new();

/// Route `tracing` output to the test writer (filtered by `RUST_LOG`)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Start a mock server that answers `verb route` with `200 OK`
pub async fn echo_ok(verb: &str, route: &str) -> MockServer {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(OK_BODY))
        .mount(&server)
        .await;
    server
}

/// Run blocking client code off the async worker threads
pub async fn blocking<F, T>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}

/// Body of the single request the server received
pub async fn only_request_body(server: &MockServer) -> Vec<u8> {
    let requests = server
        .received_requests()
        .await
        .expect("request recording is enabled");
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests[0].body.clone()
}

/// Value of `name` on the single request the server received
pub async fn only_request_header(server: &MockServer, name: &str) -> Option<String> {
    let requests = server
        .received_requests()
        .await
        .expect("request recording is enabled");
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests[0]
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
