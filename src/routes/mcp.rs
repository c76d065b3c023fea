use axum::Router;

use crate::mcp::McpService;
use crate::AppState;

/// The MCP endpoint is served at the root and at `/mcp`.
pub fn mcp_router(service: McpService) -> Router<AppState> {
    Router::new()
        .route_service("/", service.clone())
        .route_service("/mcp", service)
}
