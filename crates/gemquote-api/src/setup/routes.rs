//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use gemquote_core::constants::{
    MAX_PHOTO_SIZE_BYTES, SAMPLE_REPORT_PATH, SUBMIT_PATH, UPLOAD_PATH,
};
use gemquote_core::{Config, StorageBackend};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;
use crate::utils::upload::MULTIPART_OVERHEAD_BYTES;

/// Path the local backend's objects are served from.
pub const BLOBS_PATH: &str = "/blobs";

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let body_limit = MAX_PHOTO_SIZE_BYTES as usize + MULTIPART_OVERHEAD_BYTES;

    let mut app = Router::new()
        .route(UPLOAD_PATH, post(handlers::upload::upload_photo))
        .route(SUBMIT_PATH, post(handlers::submit::submit_record))
        .route(
            SAMPLE_REPORT_PATH,
            get(handlers::sample_report::get_sample_report),
        )
        .route("/health", get(handlers::health::health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state.clone());

    if config.storage_backend == StorageBackend::Local {
        tracing::info!(
            path = %config.local_storage_path,
            mount = BLOBS_PATH,
            "Serving local blobs"
        );
        let blobs = Router::new()
            .route(
                &format!("{}/{{*key}}", BLOBS_PATH),
                get(handlers::blobs::serve_blob),
            )
            .with_state(state);
        app = app.merge(blobs);
    }

    let app = app
        .merge(RapiDoc::with_openapi("/api/openapi.json", ApiDoc::openapi()).path("/docs"))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
