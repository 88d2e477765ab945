use axum::{http::StatusCode, Json};
use gemquote_core::pricing::{sample_report, SampleReport};

/// Static example report shown before a maker submits.
#[utoipa::path(
    get,
    path = "/api/sample-report",
    tag = "intake",
    responses((status = 200, description = "Sample pricing report"))
)]
pub async fn get_sample_report() -> Result<Json<SampleReport>, StatusCode> {
    sample_report().map(Json).map_err(|e| {
        tracing::error!(error = %e, "Failed to price sample report");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
