use crate::error::Result;
use crate::index::IndexStore;
use crate::storage::{Comic, ComicsStore};
use crate::words::Normalizer;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Lookup capability shared by the in-memory index and the durable store.
#[async_trait]
pub trait WordSearcher: Send + Sync {
    /// Posting list for one normalized token. Order is unspecified.
    async fn search_by_word(&self, word: &str) -> Result<Vec<u32>>;

    /// Full record for one ID; `Error::NotFound` if unknown.
    async fn get_comics(&self, id: u32) -> Result<Comic>;
}

/// Ranked keyword search over either lookup source.
pub struct SearchService {
    db: Arc<dyn ComicsStore>,
    index: Arc<IndexStore>,
    words: Arc<dyn Normalizer>,
}

impl SearchService {
    pub fn new(
        db: Arc<dyn ComicsStore>,
        index: Arc<IndexStore>,
        words: Arc<dyn Normalizer>,
    ) -> Arc<Self> {
        Arc::new(Self { db, index, words })
    }

    /// Searches by querying the durable store for every token.
    pub async fn db_search(&self, limit: usize, phrase: &str) -> Result<Vec<Comic>> {
        tracing::debug!("DB search: limit={} phrase={:?}", limit, phrase);
        search(self.words.as_ref(), limit, phrase, self.db.as_ref()).await
    }

    /// Searches the currently installed index generation.
    ///
    /// The generation is pinned once, so a rebuild landing mid-search cannot
    /// mix postings from one generation with comics from another.
    pub async fn index_search(&self, limit: usize, phrase: &str) -> Result<Vec<Comic>> {
        tracing::debug!("Index search: limit={} phrase={:?}", limit, phrase);
        let generation = self.index.snapshot();
        search(self.words.as_ref(), limit, phrase, generation.as_ref()).await
    }

    pub async fn search_by_word(&self, word: &str) -> Result<Vec<u32>> {
        self.index.search_by_word(word).await
    }

    pub async fn get_comics(&self, id: u32) -> Result<Comic> {
        self.index.get_comics(id).await
    }
}

/// Normalizes `phrase`, scores every comic by the number of query tokens it
/// contains and resolves the best `limit` IDs to full records.
///
/// A comic that cannot be resolved fails the whole search.
pub async fn search(
    words: &dyn Normalizer,
    limit: usize,
    phrase: &str,
    source: &dyn WordSearcher,
) -> Result<Vec<Comic>> {
    let tokens = words.normalize(phrase).inspect_err(|e| {
        tracing::error!("Failed to normalize search phrase: {}", e);
    })?;

    let mut scores: HashMap<u32, usize> = HashMap::new();
    for token in tokens.iter() {
        for id in source.search_by_word(token).await? {
            *scores.entry(id).or_insert(0) += 1;
        }
    }

    let ranked = rank(scores, limit);

    let mut results = Vec::with_capacity(ranked.len());
    for (id, _score) in ranked {
        let comic = source.get_comics(id).await.inspect_err(|e| {
            tracing::error!("Failed to resolve ranked comic {}: {}", id, e);
        })?;
        results.push(comic);
    }

    Ok(results)
}

/// Orders `(id, score)` pairs by score descending, then ID ascending, and keeps
/// the first `limit`.
pub fn rank(scores: HashMap<u32, usize>, limit: usize) -> Vec<(u32, usize)> {
    let mut ranked: Vec<(u32, usize)> = scores.into_iter().collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}
