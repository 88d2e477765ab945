//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p gemquote-api`.

pub mod fixtures;

use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use gemquote_api::setup::routes;
use gemquote_api::state::AppState;
use gemquote_core::{Config, StorageBackend};
use gemquote_storage::{BlobStore, LocalStorage, StorageError, StorageResult, StoredBlob};
use tempfile::TempDir;

pub const BLOBS_BASE_URL: &str = "http://localhost:3000/blobs";

/// Test application backed by local storage in a temporary directory.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<LocalStorage>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// A stored submission record, parsed.
    pub async fn storage_record(&self, key: &str) -> serde_json::Value {
        let body = self.storage.get(key).await.expect("read stored record");
        serde_json::from_slice(&body).expect("stored record is JSON")
    }

    /// Keys currently stored under `prefix`.
    pub async fn stored_keys(&self, prefix: &str) -> Vec<String> {
        self.storage.list(prefix).await.expect("list stored keys")
    }
}

pub async fn setup_test_app() -> TestApp {
    build_test_app(false, false).await
}

/// Same app bound to a real local port, for clients that speak HTTP.
pub async fn setup_http_test_app() -> TestApp {
    build_test_app(true, false).await
}

/// HTTP app whose photo writes succeed but whose record writes fail.
pub async fn setup_http_app_rejecting_records() -> TestApp {
    build_test_app(true, true).await
}

async fn build_test_app(http_transport: bool, reject_records: bool) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let config = Config::local(temp_dir.path().to_string_lossy().to_string(), BLOBS_BASE_URL);
    let storage = Arc::new(
        LocalStorage::new(temp_dir.path(), BLOBS_BASE_URL.to_string())
            .await
            .expect("create local storage"),
    );

    let store: Arc<dyn BlobStore> = if reject_records {
        Arc::new(RecordRejectingStore {
            inner: storage.clone(),
        })
    } else {
        storage.clone()
    };
    let state = AppState::new(config.clone(), store);
    let router = routes::setup_routes(&config, state).expect("build router");

    let server = if http_transport {
        TestServer::builder()
            .http_transport()
            .build(router)
            .expect("start http test server")
    } else {
        TestServer::new(router).expect("start test server")
    };

    TestApp {
        server,
        storage,
        _temp_dir: temp_dir,
    }
}

/// A blob store whose every operation fails, standing in for an unreachable bucket.
pub struct FailingStore;

#[async_trait]
impl BlobStore for FailingStore {
    async fn put(&self, _key: &str, _data: Vec<u8>, _content_type: &str) -> StorageResult<String> {
        Err(StorageError::UploadFailed("connection reset by peer".to_string()))
    }

    async fn fetch(&self, _key: &str) -> StorageResult<StoredBlob> {
        Err(StorageError::DownloadFailed("connection reset by peer".to_string()))
    }

    async fn exists(&self, _key: &str) -> StorageResult<bool> {
        Err(StorageError::BackendError("connection reset by peer".to_string()))
    }

    async fn list(&self, _prefix: &str) -> StorageResult<Vec<String>> {
        Err(StorageError::BackendError("connection reset by peer".to_string()))
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://unreachable.example/{}", key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Local storage that refuses every write under `submissions/`.
pub struct RecordRejectingStore {
    inner: Arc<LocalStorage>,
}

#[async_trait]
impl BlobStore for RecordRejectingStore {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<String> {
        if key.starts_with("submissions/") {
            return Err(StorageError::UploadFailed("bucket quota exceeded".to_string()));
        }
        self.inner.put(key, data, content_type).await
    }

    async fn fetch(&self, key: &str) -> StorageResult<StoredBlob> {
        self.inner.fetch(key).await
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.inner.exists(key).await
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.inner.list(prefix).await
    }

    fn public_url(&self, key: &str) -> String {
        self.inner.public_url(key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Server whose storage always fails.
pub fn setup_failing_app() -> TestServer {
    let mut config = Config::local("/nonexistent", BLOBS_BASE_URL);
    config.storage_backend = StorageBackend::S3;
    let state = AppState::new(config.clone(), Arc::new(FailingStore));
    let router = routes::setup_routes(&config, state).expect("build router");
    TestServer::new(router).expect("start test server")
}
