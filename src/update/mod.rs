//! Update Module
//!
//! Ingests new comics from the external source into the durable store.
//!
//! ## Overview
//! An update lists the IDs `1..=last_id` the store does not have yet and pushes
//! them through three worker pools connected by hand-off queues:
//!
//! ```text
//! ids ──► fetch ×N ──► normalize ×N ──► persist ×N ──► done
//! ```
//!
//! A comic that fails at any stage is logged and dropped; the run still
//! succeeds. Only one run may hold the ingestion lock at a time.
//!
//! ## Submodules
//! - **`state`**: the single-flight flag and lock.
//! - **`pipeline`**: generic stage spawner and completion barrier.
//! - **`service`**: `UpdateService` (update, stats, status, drop).
//! - **`handlers`**: Axum request handlers.
//! - **`types`**: stats and status DTOs.

pub mod handlers;
pub mod pipeline;
pub mod service;
pub mod state;
pub mod types;

pub use service::UpdateService;
pub use state::{IngestGuard, IngestState};
pub use types::{ServiceStats, UpdateStatus};
