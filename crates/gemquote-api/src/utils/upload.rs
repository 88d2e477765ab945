//! Multipart extraction for photo uploads

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use gemquote_core::AppError;

use crate::services::IncomingPhoto;

/// Field carrying the photo.
pub const FILE_FIELD: &str = "file";

/// Slack on top of the photo limit for multipart boundaries and headers.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::MalformedRequest(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Pull the photo out of an upload form.
///
/// The first field named `file` that carries a filename is the photo; a `file`
/// field without a filename is a plain text field and is skipped. Reading stops
/// as soon as the photo grows past `max_size_bytes`, so oversized bodies are
/// never buffered in full.
pub async fn extract_photo(
    mut multipart: Multipart,
    max_size_bytes: u64,
) -> Result<Option<IncomingPhoto>, AppError> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            data.extend_from_slice(&chunk);
            if data.len() as u64 > max_size_bytes {
                return Err(AppError::PayloadTooLarge(format!(
                    "{} exceeds limit of {} bytes",
                    filename, max_size_bytes
                )));
            }
        }

        return Ok(Some(IncomingPhoto {
            filename,
            content_type,
            data,
        }));
    }

    Ok(None)
}
