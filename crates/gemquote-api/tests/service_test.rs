//! Health, sample report, and docs endpoints.
//!
//! Run with: `cargo test -p gemquote-api --test service_test`

mod helpers;

use helpers::{setup_failing_app, setup_test_app};
use serde_json::Value;

#[tokio::test]
async fn test_health_with_reachable_storage() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "healthy");
}

#[tokio::test]
async fn test_health_with_failing_storage() {
    let server = setup_failing_app();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    assert_eq!(response.json::<Value>()["status"], "degraded");
}

#[tokio::test]
async fn test_sample_report() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/sample-report").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["title"], "Handmade Silver Ring");
    assert_eq!(body["breakdown"]["low"], 48.0);
    assert_eq!(body["breakdown"]["high"], 59.0);
}

#[tokio::test]
async fn test_openapi_document_lists_intake_paths() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["paths"]["/api/upload"].is_object());
    assert!(body["paths"]["/api/submit"].is_object());
}
