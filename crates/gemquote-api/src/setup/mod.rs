//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use gemquote_core::Config;
use gemquote_storage::create_storage;
use std::sync::Arc;

/// Validate config, install tracing, connect storage, and build the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(&config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage_backend,
        "Configuration loaded and validated successfully"
    );

    let storage = create_storage(&config)
        .await
        .context("Failed to initialize storage backend")?;

    let state = AppState::new(config.clone(), storage);
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
