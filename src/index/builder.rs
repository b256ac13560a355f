use super::types::IndexGeneration;
use crate::error::{Error, Result};
use crate::storage::ComicsStore;

use std::sync::Arc;

/// Materializes an [`IndexGeneration`] from a full scan of the durable store.
pub struct IndexBuilder {
    store: Arc<dyn ComicsStore>,
}

impl IndexBuilder {
    pub fn new(store: Arc<dyn ComicsStore>) -> Self {
        Self { store }
    }

    /// Scans IDs `1..=max_id`.
    ///
    /// A comic that cannot be loaded is logged and left out; only failing to read
    /// the highest ID fails the build.
    pub async fn build_index(&self) -> Result<IndexGeneration> {
        let max_id = self.store.max_id().await?;
        let mut generation = IndexGeneration::new();

        for id in 1..=max_id {
            match self.store.get_comics(id).await {
                Ok(comic) => generation.insert(comic),
                // Gaps in the ID range are expected (unpublished or skipped comics).
                Err(Error::NotFound) => tracing::trace!(comic_id = id, "No comic to index"),
                Err(e) => tracing::warn!(comic_id = id, "Failed to load comic for index: {}", e),
            }
        }

        tracing::debug!(
            "Built index: {} comics, {} words",
            generation.comics.len(),
            generation.index.len()
        );

        Ok(generation)
    }
}
