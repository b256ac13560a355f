use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A persisted comic: identity, image URL and its normalized keywords.
///
/// The ID is the identity and never changes once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comic {
    pub id: u32,
    pub url: String,
    pub keywords: BTreeSet<String>,
}

impl Comic {
    pub fn new<I, S>(id: u32, url: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            url: url.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

/// Aggregates computed by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbStats {
    /// Keyword occurrences summed over all comics.
    pub words_total: u64,
    /// Distinct keywords across all comics.
    pub words_unique: u64,
    pub comics_fetched: u64,
}
