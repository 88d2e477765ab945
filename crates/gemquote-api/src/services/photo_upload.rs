//! Photo upload service
//!
//! Accepts one photo, checks its size, and writes it under `uploads/`.

use std::sync::Arc;

use gemquote_core::constants::{DEFAULT_CONTENT_TYPE, MAX_PHOTO_SIZE_BYTES};
use gemquote_core::models::UploadedPhoto;
use gemquote_core::AppError;
use gemquote_storage::keys::photo_key;
use gemquote_storage::BlobStore;

/// The file part of an upload request.
#[derive(Debug, Clone)]
pub struct IncomingPhoto {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Clone)]
pub struct PhotoUploadService {
    storage: Arc<dyn BlobStore>,
    max_size_bytes: u64,
}

impl PhotoUploadService {
    pub fn new(storage: Arc<dyn BlobStore>) -> Self {
        PhotoUploadService {
            storage,
            max_size_bytes: MAX_PHOTO_SIZE_BYTES,
        }
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Store the photo and return where it lives.
    ///
    /// # Errors
    /// - `AppError::MissingFile` - no file part
    /// - `AppError::PayloadTooLarge` - more than 10 MiB; nothing is written
    /// - `AppError::Storage` - the blob store rejected the write
    #[tracing::instrument(
        skip(self, photo),
        fields(
            filename = photo.as_ref().map(|p| p.filename.as_str()),
            size_bytes = photo.as_ref().map(|p| p.data.len()),
            operation = "store_photo"
        )
    )]
    pub async fn store(&self, photo: Option<IncomingPhoto>) -> Result<UploadedPhoto, AppError> {
        let photo = photo.ok_or(AppError::MissingFile)?;

        let size = photo.data.len() as u64;
        if size > self.max_size_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "{} bytes exceeds limit of {} bytes",
                size, self.max_size_bytes
            )));
        }

        let content_type = photo
            .content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let key = photo_key(&photo.filename);

        let url = self.storage.put(&key, photo.data, &content_type).await?;

        tracing::info!(
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            "Photo stored"
        );

        Ok(UploadedPhoto {
            key,
            url,
            content_type,
            size,
        })
    }
}
