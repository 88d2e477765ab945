//! Intake-wide constants.

/// Upper bound for an uploaded photo, in bytes (10 MiB).
pub const MAX_PHOTO_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Content type recorded when the client sends none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Namespace for uploaded photos.
pub const UPLOADS_PREFIX: &str = "uploads";

/// Namespace for submission records.
pub const SUBMISSIONS_PREFIX: &str = "submissions";

/// Value stored in `ip` when no forwarded-for header is present.
pub const UNKNOWN_IP: &str = "unknown";

/// Default number of daily display slots.
pub const DEFAULT_DAILY_SLOT_LIMIT: u32 = 30;

/// Route paths shared by the server and the client.
pub const UPLOAD_PATH: &str = "/api/upload";
pub const SUBMIT_PATH: &str = "/api/submit";
pub const SAMPLE_REPORT_PATH: &str = "/api/sample-report";
