use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A lean summary of one image held by the container engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageSummary {
    /// Content-addressable image id, e.g. `sha256:f1b3f28a5259`
    pub id: String,
    /// `name:version` labels attached to the image, possibly empty
    pub repo_tags: Vec<String>,
    /// Creation time in Unix seconds
    pub created: i64,
    /// Image size in bytes
    pub size: u64,
}

impl ImageSummary {
    pub fn new(id: impl Into<String>, repo_tags: &[&str], created: i64, size: u64) -> Self {
        Self {
            id: id.into(),
            repo_tags: repo_tags.iter().map(|t| t.to_string()).collect(),
            created,
            size,
        }
    }
}

/// One entry of the Docker Engine `GET /images/json` response.
///
/// Only the fields we expose are decoded; everything else is ignored.
#[derive(Debug, Deserialize)]
pub struct EngineImage {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "RepoTags", default)]
    pub repo_tags: Option<Vec<String>>,
    #[serde(rename = "Created")]
    pub created: i64,
    #[serde(rename = "Size")]
    pub size: u64,
}

impl From<EngineImage> for ImageSummary {
    fn from(img: EngineImage) -> Self {
        Self {
            id: img.id,
            repo_tags: img.repo_tags.unwrap_or_default(),
            created: img.created,
            size: img.size,
        }
    }
}
