//! Submission endpoint tests.
//!
//! Run with: `cargo test -p gemquote-api --test submit_test`

mod helpers;

use chrono::Utc;
use gemquote_core::models::SubmitResponse;
use helpers::fixtures::{jpeg_bytes, photo_form, submission};
use helpers::{setup_failing_app, setup_test_app};
use serde_json::{json, Value};

#[tokio::test]
async fn test_submit_stores_record_for_today() {
    let app = setup_test_app().await;
    let today = Utc::now().format("%Y-%m-%d").to_string();

    let response = app
        .client()
        .post("/api/submit")
        .add_header("x-forwarded-for", "203.0.113.7")
        .json(&submission("http://localhost:3000/blobs/uploads/abc-ring.jpg"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: SubmitResponse = response.json();
    assert!(body.ok);
    assert!(body.id.starts_with(&format!("submissions/{}", today)));
    assert!(body.id.ends_with(".json"));

    let stored = app.storage_record(&body.id).await;
    assert_eq!(stored["email"], "maker@example.com");
    assert_eq!(stored["channel"], "Etsy");
    assert_eq!(stored["ip"], "203.0.113.7");
    assert!(stored["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_submit_without_forwarded_for_records_unknown_ip() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/submit")
        .json(&submission("http://localhost:3000/blobs/uploads/abc-ring.jpg"))
        .await;

    let body: SubmitResponse = response.json();
    assert_eq!(app.storage_record(&body.id).await["ip"], "unknown");
}

#[tokio::test]
async fn test_submit_missing_fields_writes_nothing() {
    let app = setup_test_app().await;

    for payload in [
        json!({ "photoUrl": "http://localhost:3000/blobs/uploads/x.jpg" }),
        json!({ "email": "maker@example.com" }),
        json!({ "email": "", "photoUrl": "http://localhost:3000/blobs/uploads/x.jpg" }),
        json!({}),
    ] {
        let response = app.client().post("/api/submit").json(&payload).await;
        assert_eq!(response.status_code(), 400);
        assert_eq!(response.json::<Value>(), json!({ "error": "Missing fields" }));
    }

    assert!(app.stored_keys("submissions/").await.is_empty());
}

#[tokio::test]
async fn test_submit_keeps_unvalidated_and_extra_fields() {
    let app = setup_test_app().await;

    let mut payload = submission("http://localhost:3000/blobs/uploads/x.jpg");
    payload["channel"] = json!("eBay");
    payload["referrer"] = json!("newsletter");

    let response = app.client().post("/api/submit").json(&payload).await;
    assert_eq!(response.status_code(), 200);

    let body: SubmitResponse = response.json();
    let stored = app.storage_record(&body.id).await;
    assert_eq!(stored["channel"], "eBay");
    assert_eq!(stored["referrer"], "newsletter");
}

#[tokio::test]
async fn test_unparseable_body_is_submit_failure() {
    let app = setup_test_app().await;

    let response = app.client().post("/api/submit").text("{not json").await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(response.json::<Value>()["error"], "Submit failed");
    assert!(app.stored_keys("submissions/").await.is_empty());
}

#[tokio::test]
async fn test_storage_failure_is_generic() {
    let server = setup_failing_app();

    let response = server
        .post("/api/submit")
        .json(&submission("https://unreachable.example/uploads/x.jpg"))
        .await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(response.json::<Value>(), json!({ "error": "Submit failed" }));
}

#[tokio::test]
async fn test_upload_then_submit() {
    let app = setup_test_app().await;

    let upload = app
        .client()
        .post("/api/upload")
        .multipart(photo_form("ring.jpg", jpeg_bytes(2048)))
        .await;
    assert_eq!(upload.status_code(), 200);
    let url = upload.json::<Value>()["url"].as_str().unwrap().to_string();

    let response = app.client().post("/api/submit").json(&submission(&url)).await;
    assert_eq!(response.status_code(), 200);

    let body: SubmitResponse = response.json();
    assert_eq!(app.storage_record(&body.id).await["photoUrl"], url.as_str());
}
