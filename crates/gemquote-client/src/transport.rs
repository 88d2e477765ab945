//! HTTP transport for the two intake calls.

use async_trait::async_trait;
use gemquote_core::constants::{SAMPLE_REPORT_PATH, SUBMIT_PATH, UPLOAD_PATH};
use gemquote_core::models::{SubmissionPayload, SubmitResponse, UploadResponse};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::form::PhotoFile;

/// The two requests an intake makes, in order. Implemented over HTTP by
/// [`ApiClient`]; tests substitute in-memory fakes.
#[async_trait]
pub trait IntakeTransport: Send + Sync {
    /// Phase 1: send the photo, get back its public URL.
    async fn upload_photo(&self, photo: &PhotoFile) -> Result<UploadResponse, TransportError>;

    /// Phase 2: record the submission that references the uploaded photo.
    async fn submit_record(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmitResponse, TransportError>;
}

/// `{"error": "..."}` as returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the intake API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ClientConfig::from_env()?;
        Ok(Self::new(&config)?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a 2xx JSON body, or turn anything else into `TransportError::Status`.
    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }

    /// The static sample report.
    pub async fn sample_report(&self) -> Result<serde_json::Value, TransportError> {
        let response = self
            .client
            .get(self.build_url(SAMPLE_REPORT_PATH))
            .send()
            .await?;
        Self::read_json(response).await
    }
}

#[async_trait]
impl IntakeTransport for ApiClient {
    async fn upload_photo(&self, photo: &PhotoFile) -> Result<UploadResponse, TransportError> {
        let mut part =
            reqwest::multipart::Part::bytes(photo.data.clone()).file_name(photo.filename.clone());
        if let Some(ref content_type) = photo.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        }
        let form = reqwest::multipart::Form::new().part("file", part);

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(self.build_url(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResponse = Self::read_json(response).await?;

        tracing::debug!(
            pathname = %uploaded.pathname,
            size_bytes = photo.data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Photo uploaded"
        );
        Ok(uploaded)
    }

    async fn submit_record(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmitResponse, TransportError> {
        let response = self
            .client
            .post(self.build_url(SUBMIT_PATH))
            .json(payload)
            .send()
            .await?;
        let submitted: SubmitResponse = Self::read_json(response).await?;

        tracing::debug!(id = %submitted.id, "Submission recorded");
        Ok(submitted)
    }
}
