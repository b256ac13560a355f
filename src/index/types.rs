use crate::error::{Error, Result};
use crate::search::WordSearcher;
use crate::storage::Comic;

use async_trait::async_trait;
use std::collections::HashMap;

/// One complete build of the inverted index plus the comics it points at.
///
/// Both maps come from the same store scan and are only ever replaced together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexGeneration {
    /// Keyword → IDs of the comics containing it, in scan order.
    pub index: HashMap<String, Vec<u32>>,
    pub comics: HashMap<u32, Comic>,
}

impl IndexGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a comic to the cache and its ID to every keyword's posting list.
    pub fn insert(&mut self, comic: Comic) {
        for keyword in &comic.keywords {
            self.index.entry(keyword.clone()).or_default().push(comic.id);
        }
        self.comics.insert(comic.id, comic);
    }

    pub fn postings(&self, word: &str) -> &[u32] {
        self.index.get(word).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn comic(&self, id: u32) -> Option<&Comic> {
        self.comics.get(&id)
    }

    pub fn len(&self) -> usize {
        self.comics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comics.is_empty()
    }
}

/// Lookups against one fixed generation. A search holding this sees the same
/// postings and comics for every token, whatever rebuilds happen meanwhile.
#[async_trait]
impl WordSearcher for IndexGeneration {
    async fn search_by_word(&self, word: &str) -> Result<Vec<u32>> {
        Ok(self.postings(word).to_vec())
    }

    async fn get_comics(&self, id: u32) -> Result<Comic> {
        self.comic(id).cloned().ok_or(Error::NotFound)
    }
}
