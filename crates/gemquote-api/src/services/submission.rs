//! Submission record service
//!
//! Validates the two required fields, stamps the record with `createdAt` and
//! `ip`, and writes it as pretty JSON under `submissions/`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use gemquote_core::constants::UNKNOWN_IP;
use gemquote_core::models::{SubmissionPayload, SubmissionRecord};
use gemquote_core::AppError;
use gemquote_storage::keys::submission_key;
use gemquote_storage::BlobStore;

const RECORD_CONTENT_TYPE: &str = "application/json";

/// Server-assigned fields a client must not be able to set.
const SERVER_FIELDS: [&str; 2] = ["createdAt", "ip"];

/// Where a record was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSubmission {
    /// Storage key, returned to the client as `id`
    pub id: String,
    pub url: String,
}

#[derive(Clone)]
pub struct SubmissionRecordService {
    storage: Arc<dyn BlobStore>,
}

impl SubmissionRecordService {
    pub fn new(storage: Arc<dyn BlobStore>) -> Self {
        SubmissionRecordService { storage }
    }

    pub async fn record(
        &self,
        payload: SubmissionPayload,
        forwarded_for: Option<String>,
    ) -> Result<StoredSubmission, AppError> {
        self.record_at(payload, forwarded_for, Utc::now()).await
    }

    /// Same as [`record`](Self::record) with an explicit timestamp.
    #[tracing::instrument(skip(self, payload, forwarded_for), fields(operation = "record_submission"))]
    pub async fn record_at(
        &self,
        mut payload: SubmissionPayload,
        forwarded_for: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<StoredSubmission, AppError> {
        let missing = payload.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing.join(", ")));
        }

        for field in SERVER_FIELDS {
            payload.extra.remove(field);
        }

        let ip = forwarded_for
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| UNKNOWN_IP.to_string());

        let record = SubmissionRecord {
            payload,
            created_at: now,
            ip,
        };

        let body = serde_json::to_vec_pretty(&record)
            .map_err(|e| AppError::Internal(format!("Failed to serialize record: {}", e)))?;

        let key = submission_key(now);
        let url = self.storage.put(&key, body, RECORD_CONTENT_TYPE).await?;

        tracing::info!(
            key = %key,
            channel = record.payload.channel.as_deref().unwrap_or(""),
            has_materials = record.payload.materials.is_some(),
            "Submission recorded"
        );

        Ok(StoredSubmission { id: key, url })
    }
}
