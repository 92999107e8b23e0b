//! Post ingestion pipeline for postpulse.
//!
//! Drives a scrape run end to end: submit the provider job, poll it to a
//! terminal status, fetch the result dataset, then normalize and analyze each
//! post and persist the pair. Per-post persistence failures are logged and
//! skipped so one bad record never sinks a run.

pub mod analyzer;
pub mod error;
pub mod pipeline;
pub mod store;

pub use analyzer::analyze;
pub use error::IngestError;
pub use pipeline::{run_scrape, IngestConfig, ProfileStore, ScrapeOutcome};
pub use store::PgStore;
