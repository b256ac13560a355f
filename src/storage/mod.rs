//! Durable Comics Storage
//!
//! Narrow read/write contract over the store that keeps ingested comics.
//!
//! ## Responsibilities
//! - **Write path**: the update pipeline persists one `Comic` at a time and wipes
//!   everything on an explicit drop.
//! - **Read path**: known IDs for skip-on-reingest, aggregate statistics, the
//!   highest stored ID, and the per-comic lookups used by the index builder and by
//!   direct database search.
//!
//! ## Backends
//! - **`memory`**: `DashMap`-backed store for tests and ephemeral runs.
//! - **`sqlite`**: relational store on top of SQLite.

pub mod memory;
pub mod sqlite;
pub mod types;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use types::{Comic, DbStats};

use crate::error::Result;
use crate::search::WordSearcher;
use async_trait::async_trait;

/// The durable store contract.
///
/// Every store is also a [`WordSearcher`], so ranked search can run directly
/// against it without going through the in-memory index.
#[async_trait]
pub trait ComicsStore: WordSearcher {
    /// Persists a comic. Fails if the ID is already stored.
    async fn add(&self, comic: Comic) -> Result<()>;

    /// IDs of every stored comic, in no particular order.
    async fn ids(&self) -> Result<Vec<u32>>;

    async fn stats(&self) -> Result<DbStats>;

    /// Highest stored ID, `0` for an empty store.
    async fn max_id(&self) -> Result<u32>;

    async fn drop_all(&self) -> Result<()>;
}
