//! OpenAPI documentation, served at `/api/openapi.json` and browsable at `/docs`.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use gemquote_core::models::{SubmitResponse, UploadResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "gemquote intake API",
        version = "0.1.0",
        description = "Photo upload and pricing-request intake for handmade jewelry makers."
    ),
    paths(
        handlers::upload::upload_photo,
        handlers::submit::submit_record,
        handlers::sample_report::get_sample_report,
    ),
    components(schemas(UploadResponse, SubmitResponse, ErrorResponse)),
    tags((name = "intake", description = "Beta intake endpoints"))
)]
pub struct ApiDoc;
