//! Text Normalization Module
//!
//! Turns free text into the keyword set stored with each comic and used to look
//! up search phrases. Ingestion and search must go through the same
//! `Normalizer`, otherwise query tokens would never match stored keywords.

pub mod tokenizer;

pub use tokenizer::{KeywordNormalizer, PHRASE_SIZE_LIMIT, tokenize_text};

use crate::error::Result;
use std::collections::HashSet;

/// Pure text → keyword-set function.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str) -> Result<HashSet<String>>;
}
