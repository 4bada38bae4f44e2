// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod growth;
pub mod metrics;
pub mod narratives;
pub mod report;
pub mod scanner;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::report::{GroupStats, NarrativeReport, Stage};
