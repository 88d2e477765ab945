use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A photo written to the blob store under `uploads/`. Never mutated or deleted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedPhoto {
    pub key: String,
    pub url: String,
    pub content_type: String,
    pub size: u64,
}

/// Body of a successful `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Public URL of the stored photo
    pub url: String,
    /// Storage key, e.g. `uploads/<id>-ring.jpg`
    pub pathname: String,
}

impl From<UploadedPhoto> for UploadResponse {
    fn from(photo: UploadedPhoto) -> Self {
        UploadResponse {
            url: photo.url,
            pathname: photo.key,
        }
    }
}
