use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use gemquote_core::models::UploadResponse;
use gemquote_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_photo;

/// Upload photo handler
///
/// Reads the `file` part of a multipart form and stores it under `uploads/`.
///
/// # Errors
/// - `AppError::MissingFile` - no file part (400 "No file")
/// - `AppError::PayloadTooLarge` - photo over 10 MiB (413 "File too large")
/// - `AppError::Storage` / `AppError::MalformedRequest` - 500 "Upload failed"
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "intake",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Photo stored", body = UploadResponse),
        (status = 400, description = "No file part", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Upload failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_photo"))]
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let multipart = multipart
        .map_err(|e| HttpAppError::upload(AppError::MalformedRequest(e.body_text())))?;

    let photo = extract_photo(multipart, state.photos.max_size_bytes())
        .await
        .map_err(HttpAppError::upload)?;

    let uploaded = state
        .photos
        .store(photo)
        .await
        .map_err(HttpAppError::upload)?;

    Ok(Json(uploaded.into()))
}
