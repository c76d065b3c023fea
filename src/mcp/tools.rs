//! The `images` tool: list the engine's images, optionally filtered.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::{schemars, tool, tool_router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::docker::{ImageInventory, InventoryError};
use crate::filter::{self, FilterCriteria};
use crate::mcp::server::ImagesMcpServer;
use crate::models::ImageSummary;

/// Arguments of the `images` tool.
///
/// Empty strings and non-positive numbers mean "no constraint", so
/// `createdSinceUnix: 0` cannot ask for images created at or after the epoch.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema, ToSchema,
)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImagesInput {
    /// Keep images where at least one tag starts with this prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_starts_with: Option<String>,
    /// Keep images created at or after this Unix timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_since_unix: Option<i64>,
    /// Keep images of at least this many megabytes (1 MB = 1048576 bytes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size_mb: Option<i64>,
    /// Keep images of at most this many megabytes (1 MB = 1048576 bytes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size_mb: Option<i64>,
    /// Return at most this many images
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

/// Result of the `images` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema, ToSchema)]
pub struct ImagesOutput {
    /// Images matching every given criterion, in engine order
    #[schema(inline)]
    pub result: Vec<ImageSummary>,
}

impl From<&ImagesInput> for FilterCriteria {
    fn from(input: &ImagesInput) -> Self {
        FilterCriteria {
            tag_prefix: input
                .name_starts_with
                .as_ref()
                .filter(|prefix| !prefix.is_empty())
                .cloned(),
            created_since: input.created_since_unix.filter(|since| *since > 0),
            min_size_mb: positive(input.min_size_mb),
            max_size_mb: positive(input.max_size_mb),
            limit: positive(input.limit).map(|limit| usize::try_from(limit).unwrap_or(usize::MAX)),
        }
    }
}

fn positive(value: Option<i64>) -> Option<u64> {
    value.filter(|v| *v > 0).map(|v| v as u64)
}

/// Fetch the inventory and filter it. Retrieval errors are returned as is
/// and the filter never runs on a failed fetch.
pub async fn list_images(
    inventory: &dyn ImageInventory,
    input: &ImagesInput,
) -> Result<ImagesOutput, InventoryError> {
    let criteria = FilterCriteria::from(input);
    let images = inventory.list_images().await?;
    let fetched = images.len();

    let result = filter::apply(images, &criteria);
    tracing::debug!(fetched, returned = result.len(), ?criteria, "filtered image inventory");

    Ok(ImagesOutput { result })
}

#[tool_router]
impl ImagesMcpServer {
    pub(crate) fn create_tool_router() -> ToolRouter<Self> {
        Self::tool_router()
    }

    /// Lists the engine's images. A failed fetch comes back as a tool
    /// error carrying the engine failure text.
    #[tool(
        name = "images",
        description = "List Docker images",
        annotations(read_only_hint = true)
    )]
    async fn images(
        &self,
        Parameters(input): Parameters<ImagesInput>,
    ) -> Result<Json<ImagesOutput>, String> {
        match list_images(self.inventory.as_ref(), &input).await {
            Ok(output) => Ok(Json(output)),
            Err(e) => {
                tracing::warn!("images tool failed: {}", e);
                Err(e.to_string())
            }
        }
    }
}
