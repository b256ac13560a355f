//! Update Orchestrator
//!
//! Drives one ingestion run: fetch → normalize → persist, each stage a pool of
//! `concurrency` workers, guarded so that only one run exists at a time.

use super::pipeline;
use super::state::IngestState;
use super::types::{ServiceStats, UpdateStatus};
use crate::error::{Error, Result};
use crate::source::{ComicsSource, SourceComic};
use crate::storage::{Comic, ComicsStore};
use crate::words::Normalizer;

use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub struct UpdateService {
    store: Arc<dyn ComicsStore>,
    source: Arc<dyn ComicsSource>,
    words: Arc<dyn Normalizer>,
    /// Workers per pipeline stage.
    concurrency: usize,
    state: IngestState,
}

impl UpdateService {
    /// Fails with `InvalidConfig` when `concurrency` is zero.
    pub fn new(
        store: Arc<dyn ComicsStore>,
        source: Arc<dyn ComicsSource>,
        words: Arc<dyn Normalizer>,
        concurrency: usize,
    ) -> Result<Arc<Self>> {
        if concurrency < 1 {
            return Err(Error::InvalidConfig(format!(
                "wrong concurrency specified: {}",
                concurrency
            )));
        }

        Ok(Arc::new(Self {
            store,
            source,
            words,
            concurrency,
            state: IngestState::new(),
        }))
    }

    /// Runs one ingestion pass with its own cancellation scope.
    pub async fn update(&self) -> Result<()> {
        self.update_with(CancellationToken::new()).await
    }

    /// Runs one ingestion pass that stops early when `cancel` fires.
    ///
    /// Returns `AlreadyRunning` without waiting if another pass holds the lock.
    /// Only failures before the pipeline starts are returned; per-comic
    /// failures are logged and skipped.
    pub async fn update_with(&self, cancel: CancellationToken) -> Result<()> {
        let guard = self.state.try_begin().ok_or(Error::AlreadyRunning)?;

        // Workers observe this token; it fires when the run ends or this future
        // is dropped.
        let run = cancel.child_token();
        let _stop = run.clone().drop_guard();

        let last_id = self.source.last_id().await.inspect_err(|e| {
            tracing::error!("Failed to get last comic ID: {}", e);
        })?;

        let mut known = self.store.ids().await.inspect_err(|e| {
            tracing::error!("Failed to list stored comic IDs: {}", e);
        })?;
        known.sort_unstable();

        let pending: Vec<u32> = (1..=last_id)
            .filter(|id| known.binary_search(id).is_err())
            .collect();

        tracing::info!(
            "Update started: last ID {}, {} stored, {} to fetch",
            last_id,
            known.len(),
            pending.len()
        );

        // The pipeline task owns the guard: if this future is dropped, the lock
        // stays held until every worker, including in-flight writes, is done.
        let pipeline = Pipeline {
            store: self.store.clone(),
            source: self.source.clone(),
            words: self.words.clone(),
            workers: self.concurrency,
        };
        let persisted = tokio::spawn(async move {
            let persisted = pipeline.run(pending, run).await;
            guard.end();
            persisted
        })
        .await?;

        tracing::info!("Update finished: {} comics persisted", persisted);
        Ok(())
    }

    pub async fn stats(&self) -> Result<ServiceStats> {
        let db = self.store.stats().await.inspect_err(|e| {
            tracing::error!("Failed to get DB stats: {}", e);
        })?;
        let last_id = self.source.last_id().await.inspect_err(|e| {
            tracing::error!("Failed to get last comic ID: {}", e);
        })?;

        Ok(ServiceStats {
            words_total: db.words_total,
            words_unique: db.words_unique,
            comics_fetched: db.comics_fetched,
            comics_total: u64::from(last_id.saturating_sub(1)),
        })
    }

    pub fn status(&self) -> UpdateStatus {
        if self.state.is_running() {
            UpdateStatus::Running
        } else {
            UpdateStatus::Idle
        }
    }

    /// Deletes every stored comic.
    ///
    /// Takes the ingestion lock like `update`, so it fails with
    /// `AlreadyRunning` instead of racing a pass in progress.
    pub async fn drop_all(&self) -> Result<()> {
        let guard = self.state.try_begin().ok_or(Error::AlreadyRunning)?;

        // Same ownership as `update`: the lock is released only after the
        // store call has returned, even if this future is dropped first.
        let store = self.store.clone();
        tokio::spawn(async move {
            let dropped = store.drop_all().await;
            guard.end();
            dropped
        })
        .await?
        .inspect_err(|e| {
            tracing::error!("Failed to drop comics: {}", e);
        })?;

        tracing::info!("All comics dropped");
        Ok(())
    }

    /// Calls `update` every `period` until `cancel` fires. The first pass
    /// starts immediately.
    pub async fn run_every(self: Arc<Self>, period: Duration, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }

            match self.update_with(cancel.clone()).await {
                Ok(()) => {}
                Err(Error::AlreadyRunning) => {
                    tracing::debug!("Scheduled update skipped: already running");
                }
                Err(e) => tracing::error!("Scheduled update failed: {}", e),
            }
        }

        tracing::info!("Update scheduler stopped");
    }
}

/// Collaborators of one pipeline run, moved into the task that drives it.
struct Pipeline {
    store: Arc<dyn ComicsStore>,
    source: Arc<dyn ComicsSource>,
    words: Arc<dyn Normalizer>,
    workers: usize,
}

impl Pipeline {
    /// Returns the number of comics persisted once every stage has drained.
    async fn run(self, pending: Vec<u32>, cancel: CancellationToken) -> usize {
        let workers = self.workers;
        let (ids, generator) = pipeline::generate(pending, cancel.clone());

        let source = self.source;
        let (fetched, fetchers) =
            pipeline::spawn_stage("fetch", workers, ids, cancel.clone(), move |id: u32| {
                let source = source.clone();
                async move {
                    match source.get(id).await {
                        Ok(comic) => Some(SourceComic { id, ..comic }),
                        Err(e) => {
                            tracing::warn!(comic_id = id, "Failed to fetch comic: {}", e);
                            None
                        }
                    }
                }
            });

        let words = self.words;
        let (normalized, normalizers) = pipeline::spawn_stage(
            "normalize",
            workers,
            fetched,
            cancel.clone(),
            move |comic: SourceComic| {
                let words = words.clone();
                async move {
                    match words.normalize(&comic.description) {
                        Ok(keywords) => Some(Comic::new(comic.id, comic.url, keywords)),
                        Err(e) => {
                            tracing::warn!(comic_id = comic.id, "Failed to normalize comic: {}", e);
                            None
                        }
                    }
                }
            },
        );

        let store = self.store;
        let (mut persisted, persisters) =
            pipeline::spawn_stage("persist", workers, normalized, cancel, move |comic: Comic| {
                let store = store.clone();
                async move {
                    let id = comic.id;
                    match store.add(comic).await {
                        Ok(()) => Some(id),
                        Err(e) => {
                            tracing::warn!(comic_id = id, "Failed to persist comic: {}", e);
                            None
                        }
                    }
                }
            });

        // Closes only after every persist worker has returned.
        let mut count = 0;
        while persisted.recv().await.is_some() {
            count += 1;
        }

        // Upstream workers may still be finishing an in-flight call after a
        // cancellation; wait for them too.
        if let Err(e) = generator.await {
            tracing::error!("ID generator failed: {}", e);
        }
        let failed = fetchers.join().await + normalizers.join().await + persisters.join().await;
        if failed > 0 {
            tracing::warn!("{} pipeline workers did not finish cleanly", failed);
        }

        count
    }
}
