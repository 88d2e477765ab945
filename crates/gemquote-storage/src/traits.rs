//! Storage abstraction trait
//!
//! Every backend implements `BlobStore`: key-addressed, publicly readable objects.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for gemquote_core::AppError {
    fn from(err: StorageError) -> Self {
        gemquote_core::AppError::Storage(err.to_string())
    }
}

/// An object read back together with the content type it was written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Durable, key-addressed object storage with public URLs.
///
/// Writes are plain appends: nothing here updates or deletes an object, and two
/// writers never contend because callers generate unique keys.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key` with public read access and return its public URL.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<String>;

    /// Read an object and its content type.
    async fn fetch(&self, key: &str) -> StorageResult<StoredBlob>;

    /// Read an object's bytes.
    async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        Ok(self.fetch(key).await?.data)
    }

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Keys starting with `prefix` (plain string prefix, not only whole path segments), sorted.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Public URL an object stored under `key` is served from.
    fn public_url(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Directory part of a listing prefix: `submissions/2026-10-18` -> `submissions`.
pub(crate) fn listing_root(prefix: &str) -> &str {
    match prefix.rfind('/') {
        Some(idx) => &prefix[..idx],
        None => "",
    }
}

/// Percent-encode each path segment of a key for use in a URL.
pub(crate) fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
