use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;

pub mod config;
pub mod docker;
pub mod filter;
pub mod handlers;
pub mod mcp;
pub mod models;
pub mod openapi;
pub mod routes;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 1 << 20;

#[derive(Clone)]
pub struct AppState {
    pub inventory: Arc<dyn docker::ImageInventory>,
}

impl AppState {
    pub fn new(inventory: Arc<dyn docker::ImageInventory>) -> Self {
        Self { inventory }
    }
}

/// Create the main Axum application router
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    let mcp_service = mcp::streamable_http_service(state.inventory.clone());

    Router::new()
        // MCP endpoint at / and /mcp
        .merge(routes::mcp::mcp_router(mcp_service))
        // Health and monitoring endpoints
        .merge(routes::health::health_router())
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(tower_http::timeout::TimeoutLayer::new(request_timeout))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state)
}
