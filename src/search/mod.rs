//! Search Service Module
//!
//! Executes user queries against the comics collection.
//!
//! ## Overview
//! A phrase is normalized with the same `Normalizer` used at ingestion time, each
//! token's posting list is fetched from a lookup source, and comics are scored by
//! how many query tokens they contain.
//!
//! ## Responsibilities
//! - **Ranking**: score descending, ties broken by ascending comic ID.
//! - **Retrieval**: hydrating ranked IDs into full `Comic` records.
//! - **Pluggable source**: the same algorithm runs against the in-memory index
//!   (`index_search`) or straight against the durable store (`db_search`).
//! - **API**: HTTP handlers that validate `limit`/`phrase` and call the service.
//!
//! ## Submodules
//! - **`engine`**: `WordSearcher`, `SearchService` and the ranking logic.
//! - **`handlers`**: Axum request handlers.
//! - **`types`**: request/response DTOs.

pub mod engine;
pub mod handlers;
pub mod types;

pub use engine::{SearchService, WordSearcher, rank, search};
