//! Client for the Harvest post-scraping provider.
//!
//! Wraps the provider's actor-run API (submit a profile scrape, poll the run,
//! fetch the result dataset) and normalizes its loosely-shaped post records
//! into [`postpulse_core::CanonicalPost`] values. Provider payloads are
//! untrusted: every field is optional and malformed records degrade to
//! defaults instead of failing the batch.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::{HarvestClient, RunStatus};
pub use error::ScraperError;
pub use normalize::normalize;
pub use types::RawPost;
