//! Model Context Protocol surface: the `images` tool served over
//! stateless streamable HTTP.

use std::sync::Arc;

use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};

use crate::docker::ImageInventory;

pub mod server;
pub mod tools;

pub use server::ImagesMcpServer;
pub use tools::{ImagesInput, ImagesOutput};

pub type McpService = StreamableHttpService<ImagesMcpServer, LocalSessionManager>;

/// Build the HTTP service for the MCP endpoint. Stateless mode issues no
/// session ids and answers each POST on its own.
pub fn streamable_http_service(inventory: Arc<dyn ImageInventory>) -> McpService {
    let config = StreamableHttpServerConfig {
        stateful_mode: false,
        sse_keep_alive: None,
        ..Default::default()
    };

    StreamableHttpService::new(
        move || Ok(ImagesMcpServer::new(inventory.clone())),
        LocalSessionManager::default().into(),
        config,
    )
}
