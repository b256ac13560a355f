//! Error types shared by the ingestion, indexing and search layers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// An update (or a drop) is already holding the ingestion lock.
    #[error("update already running")]
    AlreadyRunning,

    #[error("resource is not found")]
    NotFound,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The external comics source answered with something unusable.
    #[error("source error: {0}")]
    Source(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("normalization failed: {0}")]
    Normalize(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A spawned worker panicked or was cancelled by the runtime.
    #[error("worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
