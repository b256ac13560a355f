use super::Normalizer;
use crate::error::{Error, Result};

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Inputs above this size are rejected rather than tokenized.
pub const PHRASE_SIZE_LIMIT: usize = 4 * 1024;

const MIN_TOKEN_LEN: usize = 3;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("word pattern is valid"));

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had",
    "has", "have", "he", "her", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "just", "me", "my", "no", "not", "of", "on", "or", "our", "she", "so", "some", "such", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "those", "to", "too",
    "was", "we", "were", "what", "when", "where", "which", "while", "who", "why", "will", "with",
    "would", "you", "your",
];

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Folds simple English plurals onto their singular form.
fn strip_plural(word: &str) -> String {
    if word.len() > 4
        && let Some(stem) = word.strip_suffix("ies")
    {
        return format!("{}y", stem);
    }

    if word.len() > 3
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
    {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

/// Keyword normalizer used for both ingestion and queries.
///
/// Splits on anything that is not a letter or digit, lowercases, drops stop words
/// and tokens shorter than three characters, folds plurals and deduplicates.
#[derive(Debug, Clone)]
pub struct KeywordNormalizer {
    size_limit: usize,
}

impl KeywordNormalizer {
    pub fn new() -> Self {
        Self {
            size_limit: PHRASE_SIZE_LIMIT,
        }
    }

    pub fn with_limit(size_limit: usize) -> Self {
        Self { size_limit }
    }
}

impl Default for KeywordNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer for KeywordNormalizer {
    fn normalize(&self, text: &str) -> Result<HashSet<String>> {
        if text.len() > self.size_limit {
            return Err(Error::Normalize(format!(
                "input of {} bytes exceeds the {} byte limit",
                text.len(),
                self.size_limit
            )));
        }

        Ok(tokenize_text(text))
    }
}

/// Tokenizes `text` into the deduplicated keyword set.
pub fn tokenize_text(text: &str) -> HashSet<String> {
    WORD_RE
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str())
        .filter(|word| !is_stop_word(word))
        .filter(|word| word.chars().count() >= MIN_TOKEN_LEN)
        .map(strip_plural)
        .collect()
}
