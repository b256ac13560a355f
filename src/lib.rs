//! Comics Search Library
//!
//! Ingests numbered comics from an external source, keeps them in a durable
//! store, and serves ranked keyword search over an in-memory inverted index.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! - **`update`**: the ingestion pipeline (fetch → normalize → persist) with
//!   bounded worker pools and single-flight runs.
//! - **`index`**: periodic full-scan rebuilds of the inverted index, swapped in
//!   atomically.
//! - **`search`**: term-overlap ranking over the index or the store.
//! - **`source`**: the XKCD client.
//! - **`words`**: keyword normalization shared by ingestion and search.
//! - **`storage`**: the durable store contract with memory and SQLite backends.
//! - **`config`** / **`error`**: configuration and the shared error type.

pub mod config;
pub mod error;
pub mod index;
pub mod search;
pub mod source;
pub mod storage;
pub mod update;
pub mod words;

pub use error::{Error, Result};
