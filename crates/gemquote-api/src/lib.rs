//! gemquote intake API
//!
//! HTTP handlers, services, and application setup for the photo upload and
//! submission record endpoints.

mod api_doc;
mod handlers;
mod telemetry;
mod utils;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
