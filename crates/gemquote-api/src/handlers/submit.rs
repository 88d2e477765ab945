use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use gemquote_core::models::{SubmissionPayload, SubmitResponse};
use gemquote_core::AppError;
use serde_json::Value;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::forwarded_for::ForwardedFor;

/// Parse a submission body.
///
/// The content type is not checked. A JSON document that is not an object
/// (`null`, an array) carries no fields and so fails the required-field check
/// downstream; text that is not JSON at all is malformed.
fn parse_payload(body: &[u8]) -> Result<SubmissionPayload, AppError> {
    match serde_json::from_slice::<Value>(body)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value)?),
        _ => Ok(SubmissionPayload::default()),
    }
}

/// Submit record handler
///
/// Stores the payload as a JSON record under `submissions/<date>-<id>.json`.
/// Only `email` and `photoUrl` are required; every other field, known or not,
/// is kept as sent.
#[utoipa::path(
    post,
    path = "/api/submit",
    tag = "intake",
    request_body(content = inline(Object), content_type = "application/json"),
    responses(
        (status = 200, description = "Submission recorded", body = SubmitResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 500, description = "Submit failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, body), fields(operation = "submit_record"))]
pub async fn submit_record(
    State(state): State<Arc<AppState>>,
    ForwardedFor(forwarded_for): ForwardedFor,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SubmitResponse>, HttpAppError> {
    let body = body.map_err(|e| HttpAppError::submit(AppError::MalformedRequest(e.body_text())))?;
    let payload = parse_payload(&body).map_err(HttpAppError::submit)?;

    let stored = state
        .submissions
        .record(payload, forwarded_for)
        .await
        .map_err(HttpAppError::submit)?;

    Ok(Json(SubmitResponse {
        ok: true,
        id: stored.id,
    }))
}
