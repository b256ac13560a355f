//! Index Module
//!
//! In-memory inverted index rebuilt periodically from the durable store.
//!
//! ## Overview
//! Each rebuild produces a fresh [`IndexGeneration`] (keyword → IDs plus
//! ID → comic) from one full scan. The store swaps the whole generation behind a
//! single pointer, so readers always see a posting list and a comic cache that
//! belong together.
//!
//! ## Submodules
//! - **`builder`**: full-scan `IndexBuilder`.
//! - **`store`**: `IndexStore` with the refresh loop and point lookups.
//! - **`types`**: `IndexGeneration`.

pub mod builder;
pub mod store;
pub mod types;

pub use builder::IndexBuilder;
pub use store::IndexStore;
pub use types::IndexGeneration;

#[cfg(test)]
mod tests;
