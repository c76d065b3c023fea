use async_trait::async_trait;

use crate::models::ImageSummary;

/// Errors raised while fetching the image inventory from the engine
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("invalid docker host {host:?}: {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("permission denied connecting to the container engine at {endpoint}")]
    PermissionDenied { endpoint: String },

    #[error("container engine at {endpoint} is unreachable: {source}")]
    Unreachable {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("container engine transport error: {0}")]
    Transport(#[from] hyper::Error),

    #[error("container engine returned {status}: {message}")]
    Engine { status: u16, message: String },

    #[error("malformed response from container engine: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("container engine did not answer within {0} seconds")]
    Timeout(u64),
}

/// Source of the image inventory
#[async_trait]
pub trait ImageInventory: Send + Sync + 'static {
    /// Fetch the full, unfiltered inventory
    async fn list_images(&self) -> Result<Vec<ImageSummary>, InventoryError>;

    /// Check that the backing engine answers
    async fn ping(&self) -> Result<(), InventoryError>;
}

pub mod engine;
pub mod memory;

pub use engine::{DockerEngine, EngineEndpoint};
pub use memory::InMemoryInventory;
