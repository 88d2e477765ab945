//! Client error types

use thiserror::Error;

use crate::form::SubmitBlocker;

/// A request to the intake API that did not produce the expected body.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Failed to build request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Session-scoped storage could not be read or written.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Calls the intake flow refuses in its current state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("a submission is already in flight")]
    InFlight,

    #[error("the intake is not collecting input (state: {0})")]
    NotCollecting(&'static str),

    #[error("cannot submit yet: {0}")]
    Blocked(SubmitBlocker),
}
