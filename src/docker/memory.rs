use async_trait::async_trait;

use super::{ImageInventory, InventoryError};
use crate::models::ImageSummary;

/// Fixed inventory held in memory, for tests and the `--mock` mode
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventory {
    images: Vec<ImageSummary>,
    failure: Option<String>,
}

impl InMemoryInventory {
    pub fn new(images: Vec<ImageSummary>) -> Self {
        Self {
            images,
            failure: None,
        }
    }

    /// An inventory whose engine always reports `message` as a 500 error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            images: Vec::new(),
            failure: Some(message.into()),
        }
    }

    /// A small demo inventory.
    pub fn sample() -> Self {
        Self::new(vec![
            ImageSummary::new(
                "sha256:f1b3f28a5259",
                &["ubuntu:latest", "ubuntu:22.04"],
                1678886400,
                72957747,
            ),
            ImageSummary::new(
                "sha256:c3c3c3c3c3c3",
                &["golang:1.21-alpine"],
                1678880000,
                389934592,
            ),
            ImageSummary::new("sha256:a1a1a1a1a1a1", &["alpine:latest"], 1678870000, 5592324),
        ])
    }

    fn check(&self) -> Result<(), InventoryError> {
        match &self.failure {
            Some(message) => Err(InventoryError::Engine {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ImageInventory for InMemoryInventory {
    async fn list_images(&self) -> Result<Vec<ImageSummary>, InventoryError> {
        self.check()?;
        Ok(self.images.clone())
    }

    async fn ping(&self) -> Result<(), InventoryError> {
        self.check()
    }
}
