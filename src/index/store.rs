use super::builder::IndexBuilder;
use super::types::IndexGeneration;
use crate::error::Result;
use crate::search::WordSearcher;
use crate::storage::Comic;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Holds the live index generation and refreshes it every `ttl`.
///
/// Readers clone the current `Arc` and work on that snapshot, so a rebuild
/// finishing mid-query never changes what the query sees.
pub struct IndexStore {
    builder: IndexBuilder,
    ttl: Duration,
    current: RwLock<Arc<IndexGeneration>>,
}

impl IndexStore {
    pub fn new(builder: IndexBuilder, ttl: Duration) -> Arc<Self> {
        Arc::new(Self {
            builder,
            ttl,
            current: RwLock::new(Arc::new(IndexGeneration::new())),
        })
    }

    /// The generation currently installed.
    pub fn snapshot(&self) -> Arc<IndexGeneration> {
        self.current.read().clone()
    }

    /// Builds a new generation and installs it. On failure the previous
    /// generation stays live.
    pub async fn rebuild(&self) -> Result<()> {
        let generation = self.builder.build_index().await?;
        let comics = generation.len();

        *self.current.write() = Arc::new(generation);

        tracing::info!("Index build complete: {} comics", comics);
        Ok(())
    }

    /// Runs the initial build, then rebuilds every `ttl` until `cancel` fires.
    ///
    /// A failed initial build is logged and leaves the index empty until the
    /// next successful rebuild.
    pub async fn start(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        if let Err(e) = self.rebuild().await {
            tracing::error!("Initial index build failed: {}", e);
        }

        tracing::info!("Index refresh started (every {:?})", self.ttl);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + self.ttl, self.ttl);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        if let Err(e) = self.rebuild().await {
                            tracing::error!("Index build failed, keeping previous index: {}", e);
                        }
                    }
                }
            }

            tracing::info!("Index refresh stopped");
        })
    }
}

#[async_trait]
impl WordSearcher for IndexStore {
    async fn search_by_word(&self, word: &str) -> Result<Vec<u32>> {
        self.snapshot().search_by_word(word).await
    }

    async fn get_comics(&self, id: u32) -> Result<Comic> {
        self.snapshot().get_comics(id).await
    }
}
