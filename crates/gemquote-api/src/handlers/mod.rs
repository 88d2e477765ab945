pub mod blobs;
pub mod health;
pub mod sample_report;
pub mod submit;
pub mod upload;
