use super::ComicsStore;
use super::types::{Comic, DbStats};
use crate::error::{Error, Result};
use crate::search::WordSearcher;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::HashSet;
use std::sync::Arc;

/// In-memory comics store.
///
/// Nothing survives a restart; used by tests and by `db_path = ":memory:"` runs
/// that do not want a SQLite file.
#[derive(Clone, Default)]
pub struct MemoryStore {
    comics: Arc<DashMap<u32, Comic>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.comics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comics.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.comics.contains_key(&id)
    }
}

#[async_trait]
impl WordSearcher for MemoryStore {
    async fn search_by_word(&self, word: &str) -> Result<Vec<u32>> {
        Ok(self
            .comics
            .iter()
            .filter(|entry| entry.value().keywords.contains(word))
            .map(|entry| *entry.key())
            .collect())
    }

    async fn get_comics(&self, id: u32) -> Result<Comic> {
        self.comics
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(Error::NotFound)
    }
}

#[async_trait]
impl ComicsStore for MemoryStore {
    async fn add(&self, comic: Comic) -> Result<()> {
        match self.comics.entry(comic.id) {
            Entry::Occupied(_) => Err(Error::Storage(format!(
                "comic {} already stored",
                comic.id
            ))),
            Entry::Vacant(slot) => {
                tracing::debug!("Stored comic {} in memory", comic.id);
                slot.insert(comic);
                Ok(())
            }
        }
    }

    async fn ids(&self) -> Result<Vec<u32>> {
        Ok(self.comics.iter().map(|entry| *entry.key()).collect())
    }

    async fn stats(&self) -> Result<DbStats> {
        let mut words_total = 0u64;
        let mut unique = HashSet::new();

        for entry in self.comics.iter() {
            words_total += entry.value().keywords.len() as u64;
            unique.extend(entry.value().keywords.iter().cloned());
        }

        Ok(DbStats {
            words_total,
            words_unique: unique.len() as u64,
            comics_fetched: self.comics.len() as u64,
        })
    }

    async fn max_id(&self) -> Result<u32> {
        Ok(self
            .comics
            .iter()
            .map(|entry| *entry.key())
            .max()
            .unwrap_or(0))
    }

    async fn drop_all(&self) -> Result<()> {
        self.comics.clear();
        tracing::info!("Dropped all comics from memory store");
        Ok(())
    }
}
