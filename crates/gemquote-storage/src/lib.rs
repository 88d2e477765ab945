//! gemquote storage library
//!
//! The `BlobStore` trait and its backends (S3-compatible object storage and the
//! local filesystem).
//!
//! # Key layout
//!
//! - Photos: `uploads/{uuid}-{filename}` with whitespace runs in the filename
//!   collapsed to a single `-` and characters stores escape replaced by `-`.
//! - Records: `submissions/{YYYY-MM-DD}-{uuid}.json`, dated in UTC.
//!
//! Keys must not contain `..` components or a leading `/`. Key generation lives in
//! the `keys` module so every backend and service agrees on the layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use gemquote_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{BlobStore, StorageError, StorageResult, StoredBlob};
