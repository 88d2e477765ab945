//! Server-side intake services.

pub mod photo_upload;
pub mod submission;

pub use photo_upload::{IncomingPhoto, PhotoUploadService};
pub use submission::{StoredSubmission, SubmissionRecordService};
