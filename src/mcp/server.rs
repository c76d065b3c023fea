//! MCP server handler for the image inventory.

use std::sync::Arc;

use rmcp::{
    handler::server::router::tool::ToolRouter,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool_handler, ServerHandler,
};

use crate::docker::ImageInventory;

pub const SERVER_NAME: &str = "docker-images";

const INSTRUCTIONS: &str = "Call the `images` tool to list Docker images. \
All arguments are optional; sizes are in binary megabytes.";

/// Exposes the `images` tool. Holds no per-session state, so a fresh
/// instance can serve every request.
#[derive(Clone)]
pub struct ImagesMcpServer {
    pub(crate) inventory: Arc<dyn ImageInventory>,
    tool_router: ToolRouter<Self>,
}

impl ImagesMcpServer {
    pub fn new(inventory: Arc<dyn ImageInventory>) -> Self {
        Self {
            inventory,
            tool_router: Self::create_tool_router(),
        }
    }
}

#[tool_handler]
impl ServerHandler for ImagesMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: Some("Docker Images".into()),
                description: Some("Lists the images of the local container engine.".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}
