//! Public read access to objects in the local backend.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use gemquote_storage::StorageError;

use crate::state::AppState;

/// Serve a stored object with the content type it was uploaded with.
#[tracing::instrument(skip(state), fields(operation = "serve_blob"))]
pub async fn serve_blob(State(state): State<Arc<AppState>>, Path(key): Path<String>) -> Response {
    match state.storage.fetch(&key).await {
        Ok(blob) => ([(header::CONTENT_TYPE, blob.content_type)], blob.data).into_response(),
        Err(StorageError::NotFound(_) | StorageError::InvalidKey(_)) => {
            StatusCode::NOT_FOUND.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, key = %key, "Failed to read blob");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
