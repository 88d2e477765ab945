//! Data models for the intake pipeline
//!
//! Wire types shared by the HTTP server and the client, plus the client-local
//! queue estimate.

mod photo;
mod queue;
mod submission;

pub use photo::{UploadResponse, UploadedPhoto};
pub use queue::QueueEstimate;
pub use submission::{Brand, Channel, SubmissionPayload, SubmissionRecord, SubmitResponse};
