use axum::Json;
use utoipa::OpenApi;

use crate::handlers::health;
use crate::mcp::tools::{ImagesInput, ImagesOutput};
use crate::models::ImageSummary;

/// Generate the OpenAPI documentation for the HTTP surface
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        health::check,
    ),
    components(
        schemas(
            health::HealthResponse,

            // images tool arguments and result
            ImagesInput,
            ImagesOutput,
            ImageSummary,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
