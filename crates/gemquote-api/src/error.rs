//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. The wrapper remembers which endpoint
//! the error surfaced on, because generic failures read "Upload failed" on one
//! and "Submit failed" on the other.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gemquote_core::{AppError, ErrorMetadata, IntakeOperation, LogLevel};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body. Always one short fixed message; internal detail stays in the logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wrapper type for AppError to implement IntoResponse
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    pub operation: IntakeOperation,
}

impl HttpAppError {
    pub fn upload(error: impl Into<AppError>) -> Self {
        HttpAppError {
            error: error.into(),
            operation: IntakeOperation::Upload,
        }
    }

    pub fn submit(error: impl Into<AppError>) -> Self {
        HttpAppError {
            error: error.into(),
            operation: IntakeOperation::Submit,
        }
    }
}

fn log_error(error: &AppError, operation: IntakeOperation) {
    let error_type = error.error_type();
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, code, %operation, "Request rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, code, %operation, "Request rejected");
        }
        LogLevel::Error => {
            tracing::error!(error = ?error, error_type, code, %operation, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.error, self.operation);

        let body = ErrorResponse {
            error: self.error.client_message(self.operation).to_string(),
        };

        (status, Json(body)).into_response()
    }
}
