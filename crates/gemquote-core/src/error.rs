//! Error types module
//!
//! All intake failures are unified under `AppError`. The HTTP layer never shows
//! internal detail to clients: every variant collapses into one of three fixed
//! messages per endpoint (see [`ErrorMetadata::client_message`]).

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for client mistakes worth noticing (oversized uploads)
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// The endpoint an error was raised on. Generic failure messages differ per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeOperation {
    Upload,
    Submit,
}

impl IntakeOperation {
    /// Message returned for any failure that is not a validation error.
    pub fn failure_message(self) -> &'static str {
        match self {
            IntakeOperation::Upload => "Upload failed",
            IntakeOperation::Submit => "Submit failed",
        }
    }
}

impl Display for IntakeOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            IntakeOperation::Upload => write!(f, "upload"),
            IntakeOperation::Submit => write!(f, "submit"),
        }
    }
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message for the endpoint the error surfaced on
    fn client_message(&self, operation: IntakeOperation) -> &'static str;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No file part in upload")]
    MissingFile,

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Missing required fields: {0}")]
    MissingFields(String),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedRequest(format!("JSON error: {}", err))
    }
}

impl AppError {
    /// Short type name for structured logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::MissingFile => "MissingFile",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::MissingFields(_) => "MissingFields",
            AppError::MalformedRequest(_) => "MalformedRequest",
            AppError::Storage(_) => "Storage",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "InternalWithSource",
        }
    }

    /// Whether this is a user-correctable validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::MissingFile | AppError::PayloadTooLarge(_) | AppError::MissingFields(_)
        )
    }
}

/// Static metadata for each variant: (http_status, error_code, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::MissingFile => (400, "MISSING_FILE", LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", LogLevel::Warn),
        AppError::MissingFields(_) => (400, "MISSING_FIELDS", LogLevel::Debug),
        // Unreadable bodies are not part of the validation contract; they surface
        // as the endpoint's generic failure.
        AppError::MalformedRequest(_) => (500, "MALFORMED_REQUEST", LogLevel::Warn),
        AppError::Storage(_) => (500, "STORAGE_ERROR", LogLevel::Error),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_ERROR", LogLevel::Error)
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self, operation: IntakeOperation) -> &'static str {
        match self {
            AppError::MissingFile => "No file",
            AppError::PayloadTooLarge(_) => "File too large",
            AppError::MissingFields(_) => "Missing fields",
            AppError::MalformedRequest(_)
            | AppError::Storage(_)
            | AppError::Internal(_)
            | AppError::InternalWithSource { .. } => operation.failure_message(),
        }
    }
}
