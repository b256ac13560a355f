//! External Comics Source
//!
//! Fetches published comics by number and reports the newest number available.
//!
//! ## Submodules
//! - **`xkcd`**: `reqwest` client for the XKCD JSON API.
//! - **`types`**: wire payload and the normalized `SourceComic`.

pub mod types;
pub mod xkcd;

pub use types::{SourceComic, XkcdInfo};
pub use xkcd::XkcdClient;

use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ComicsSource: Send + Sync {
    /// The newest published comic.
    async fn latest(&self) -> Result<SourceComic>;

    /// One comic by number; `Error::NotFound` for numbers that do not exist.
    async fn get(&self, id: u32) -> Result<SourceComic>;

    /// Number of the newest published comic.
    async fn last_id(&self) -> Result<u32> {
        Ok(self.latest().await?.id)
    }
}
