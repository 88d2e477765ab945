use std::sync::Arc;

use gemquote_core::Config;
use gemquote_storage::BlobStore;

use crate::services::{PhotoUploadService, SubmissionRecordService};

/// Shared handler state. Both services write through the same blob store.
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn BlobStore>,
    pub photos: PhotoUploadService,
    pub submissions: SubmissionRecordService,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn BlobStore>) -> Arc<Self> {
        Arc::new(AppState {
            photos: PhotoUploadService::new(storage.clone()),
            submissions: SubmissionRecordService::new(storage.clone()),
            config,
            storage,
        })
    }
}
