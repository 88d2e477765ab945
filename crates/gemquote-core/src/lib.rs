//! gemquote core library
//!
//! Domain models, error taxonomy, configuration, and pricing helpers shared by
//! the intake server, the storage backends, and the client.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod pricing;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, IntakeOperation, LogLevel};
pub use storage_types::StorageBackend;
