use crate::storage::Comic;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: usize = 10;

/// Query string for `/api/search` and `/api/isearch`.
///
/// `limit` stays a string so a malformed value can be answered with 400 instead
/// of the extractor's generic rejection.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub phrase: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComicItem {
    pub id: u32,
    pub url: String,
}

impl From<Comic> for ComicItem {
    fn from(comic: Comic) -> Self {
        Self {
            id: comic.id,
            url: comic.url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub comics: Vec<ComicItem>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WordResponse {
    pub word: String,
    pub ids: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
