use crate::traits::{
    encode_key, listing_root, BlobStore, StorageError, StorageResult, StoredBlob,
};
use crate::StorageBackend;
use async_trait::async_trait;
use gemquote_core::constants::DEFAULT_CONTENT_TYPE;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Directory under `base_path` holding one sidecar file per object with the
/// content type it was written with.
const CONTENT_TYPES_DIR: &str = ".content-types";

/// Local filesystem storage implementation
///
/// Objects are plain files under `base_path`; the API serves them back with
/// their stored content type so the URLs returned by `put` are publicly readable.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for object storage (e.g., "/var/lib/gemquote/blobs")
    /// * `base_url` - Base URL the directory is served from (e.g., "http://localhost:3000/blobs")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Only plain relative components are accepted, so a key can never resolve
    /// outside the base directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() || key.starts_with('/') || key.contains('\\') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let relative = Path::new(key);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }
        if relative.starts_with(CONTENT_TYPES_DIR) {
            return Err(StorageError::InvalidKey(
                "Storage key is reserved for metadata".to_string(),
            ));
        }

        Ok(self.base_path.join(relative))
    }

    /// Sidecar path holding the content type of `key`. The key must already be validated.
    fn content_type_path(&self, key: &str) -> PathBuf {
        self.base_path.join(CONTENT_TYPES_DIR).join(key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Storage key for a file found while walking `base_path`.
    fn path_to_key(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.base_path).ok()?;
        let parts: Vec<&str> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        Some(parts.join("/"))
    }
}

#[async_trait]
impl BlobStore for LocalStorage {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let meta_path = self.content_type_path(key);
        self.ensure_parent_dir(&meta_path).await?;
        fs::write(&meta_path, content_type).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to record content type for {}: {}",
                key, e
            ))
        })?;

        let url = self.public_url(key);

        tracing::info!(
            path = %path.display(),
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage put successful"
        );

        Ok(url)
    }

    async fn fetch(&self, key: &str) -> StorageResult<StoredBlob> {
        let path = self.key_to_path(key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        let content_type = match fs::read_to_string(self.content_type_path(key)).await {
            Ok(recorded) if !recorded.trim().is_empty() => recorded.trim().to_string(),
            _ => DEFAULT_CONTENT_TYPE.to_string(),
        };

        Ok(StoredBlob { data, content_type })
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let root = listing_root(prefix);
        let root_path = if root.is_empty() {
            self.base_path.clone()
        } else {
            self.key_to_path(root)?
        };

        if !fs::try_exists(&root_path).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let content_types_root = self.base_path.join(CONTENT_TYPES_DIR);
        let mut keys = Vec::new();
        let mut pending = vec![root_path];
        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                if entry.path() == content_types_root {
                    continue;
                }
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if let Some(key) = self.path_to_key(&entry.path()) {
                    if key.starts_with(prefix) {
                        keys.push(key);
                    }
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), encode_key(key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
