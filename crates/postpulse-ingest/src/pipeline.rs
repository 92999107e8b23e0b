//! Scrape run orchestration.

use std::time::Duration;

use chrono::{DateTime, Utc};
use postpulse_core::{CanonicalPost, PostAnalysis};
use postpulse_db::DbError;
use postpulse_scraper::{normalize, HarvestClient};
use uuid::Uuid;

use crate::analyzer::analyze;
use crate::error::IngestError;

/// Tuning knobs for a scrape run.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Delay between provider status polls.
    pub poll_interval: Duration,
    /// Poll ceiling; exhausting it fails the run with the last seen status.
    pub max_poll_attempts: u32,
    /// When enabled, posts whose `external_id` already exists for the profile
    /// are skipped instead of stored again.
    pub dedupe_rescraped_posts: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_poll_attempts: 60,
            dedupe_rescraped_posts: false,
        }
    }
}

impl IngestConfig {
    #[must_use]
    pub fn from_app_config(config: &postpulse_core::AppConfig) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            max_poll_attempts: config.max_poll_attempts,
            dedupe_rescraped_posts: config.dedupe_rescraped_posts,
        }
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeOutcome {
    /// Posts retrieved from the provider's dataset.
    pub posts_scraped: usize,
    /// Posts whose canonical record and analysis were both persisted.
    pub posts_stored: usize,
}

/// Persistence seam for the pipeline.
///
/// Implemented by [`crate::PgStore`] for Postgres and by in-memory fakes in
/// tests. Static dispatch only; dyn compatibility is not needed.
#[allow(async_fn_in_trait)]
pub trait ProfileStore {
    /// Compare-and-swap the profile into `scraping` status. Returns `false`
    /// when the profile is missing or a run is already in flight.
    async fn claim_profile(&self, profile_id: Uuid) -> Result<bool, DbError>;

    async fn mark_failed(&self, profile_id: Uuid) -> Result<(), DbError>;

    async fn mark_completed(
        &self,
        profile_id: Uuid,
        scraped_at: DateTime<Utc>,
    ) -> Result<(), DbError>;

    async fn post_exists(&self, profile_id: Uuid, external_id: &str) -> Result<bool, DbError>;

    async fn insert_post(&self, profile_id: Uuid, post: &CanonicalPost) -> Result<i64, DbError>;

    async fn insert_analysis(&self, post_id: i64, analysis: &PostAnalysis)
        -> Result<(), DbError>;
}

/// Run one scrape end to end for a profile.
///
/// State machine: `pending -> scraping -> {completed | failed}`.
///
/// 1. Claim the profile (CAS on its status); a second concurrent run for the
///    same profile is rejected with [`IngestError::AlreadyRunning`].
/// 2. Submit the provider job; no run id is [`IngestError::JobStart`].
/// 3. Poll every `poll_interval` up to `max_poll_attempts` while the run
///    reports `"RUNNING"`. The wait is a cooperative async sleep.
/// 4. A terminal status other than `"SUCCEEDED"`, or a missing dataset id,
///    is [`IngestError::JobFailed`] carrying the last observed status.
/// 5. Fetch the dataset and, per post in provider order: normalize, analyze,
///    persist the pair. A per-post persistence failure is logged and that
///    post is skipped; the run keeps going. The policy is deliberate:
///    maximize stored posts over all-or-nothing consistency.
/// 6. Mark the profile `completed` and stamp `last_scraped_at`.
///
/// Every error path marks the profile `failed` before returning, so a run
/// can never leave the status stuck at `scraping`.
///
/// # Errors
///
/// [`IngestError::AlreadyRunning`], [`IngestError::JobStart`],
/// [`IngestError::JobFailed`], or a [`ScraperError`]/[`DbError`] from the
/// provider or store.
///
/// [`ScraperError`]: postpulse_scraper::ScraperError
pub async fn run_scrape<S: ProfileStore>(
    client: &HarvestClient,
    store: &S,
    config: &IngestConfig,
    profile_id: Uuid,
    profile_url: &str,
    max_posts: u32,
) -> Result<ScrapeOutcome, IngestError> {
    if !store.claim_profile(profile_id).await? {
        return Err(IngestError::AlreadyRunning);
    }

    tracing::info!(%profile_id, profile_url, max_posts, "scrape run started");

    match ingest_profile(client, store, config, profile_id, profile_url, max_posts).await {
        Ok(outcome) => {
            tracing::info!(
                %profile_id,
                posts_scraped = outcome.posts_scraped,
                posts_stored = outcome.posts_stored,
                "scrape run completed"
            );
            Ok(outcome)
        }
        Err(err) => {
            tracing::error!(%profile_id, error = %err, "scrape run failed");
            if let Err(mark_err) = store.mark_failed(profile_id).await {
                tracing::error!(
                    %profile_id,
                    error = %mark_err,
                    "could not mark profile failed after run error"
                );
            }
            Err(err)
        }
    }
}

/// The fallible body of a run; [`run_scrape`] maps any error from here to a
/// `failed` profile status.
async fn ingest_profile<S: ProfileStore>(
    client: &HarvestClient,
    store: &S,
    config: &IngestConfig,
    profile_id: Uuid,
    profile_url: &str,
    max_posts: u32,
) -> Result<ScrapeOutcome, IngestError> {
    let run_id = client
        .start_profile_scrape(profile_url, max_posts)
        .await?
        .ok_or(IngestError::JobStart)?;

    let mut status = "RUNNING".to_string();
    let mut dataset_id: Option<String> = None;
    let mut attempts = 0u32;

    while status == "RUNNING" && attempts < config.max_poll_attempts {
        tokio::time::sleep(config.poll_interval).await;
        let run = client.get_run_status(&run_id).await?;
        status = run.status;
        dataset_id = run.dataset_id;
        attempts += 1;
        tracing::debug!(%profile_id, run_id = %run_id, attempts, status = %status, "polled scrape run");
    }

    let Some(dataset_id) = dataset_id.filter(|_| status == "SUCCEEDED") else {
        return Err(IngestError::JobFailed { status });
    };

    let posts = client.get_dataset_items(&dataset_id).await?;
    let posts_scraped = posts.len();
    let mut posts_stored = 0usize;

    for raw in &posts {
        let canonical = normalize(raw);
        let analysis = analyze(&canonical.content);

        if config.dedupe_rescraped_posts {
            match store.post_exists(profile_id, &canonical.external_id).await {
                Ok(true) => {
                    tracing::debug!(
                        %profile_id,
                        external_id = %canonical.external_id,
                        "post already stored, skipping"
                    );
                    continue;
                }
                Ok(false) => {}
                // An existence-check failure falls through to the insert:
                // storing a possible duplicate beats dropping the post.
                Err(e) => {
                    tracing::warn!(
                        %profile_id,
                        external_id = %canonical.external_id,
                        error = %e,
                        "dedupe check failed"
                    );
                }
            }
        }

        let post_id = match store.insert_post(profile_id, &canonical).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(
                    %profile_id,
                    external_id = %canonical.external_id,
                    error = %e,
                    "failed to store post, skipping"
                );
                continue;
            }
        };

        if let Err(e) = store.insert_analysis(post_id, &analysis).await {
            tracing::warn!(
                %profile_id,
                post_id,
                error = %e,
                "failed to store analysis, post not counted"
            );
            continue;
        }

        posts_stored += 1;
    }

    store.mark_completed(profile_id, Utc::now()).await?;

    Ok(ScrapeOutcome {
        posts_scraped,
        posts_stored,
    })
}
