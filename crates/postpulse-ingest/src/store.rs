//! Postgres-backed implementation of the pipeline's persistence seam.

use chrono::{DateTime, Utc};
use postpulse_core::{CanonicalPost, PostAnalysis, ScrapeStatus};
use postpulse_db::DbError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::pipeline::ProfileStore;

/// [`ProfileStore`] over a live Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ProfileStore for PgStore {
    async fn claim_profile(&self, profile_id: Uuid) -> Result<bool, DbError> {
        postpulse_db::claim_profile_for_scrape(&self.pool, profile_id).await
    }

    async fn mark_failed(&self, profile_id: Uuid) -> Result<(), DbError> {
        postpulse_db::set_profile_scrape_status(&self.pool, profile_id, ScrapeStatus::Failed).await
    }

    async fn mark_completed(
        &self,
        profile_id: Uuid,
        scraped_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        postpulse_db::mark_profile_scrape_completed(&self.pool, profile_id, scraped_at).await
    }

    async fn post_exists(&self, profile_id: Uuid, external_id: &str) -> Result<bool, DbError> {
        postpulse_db::scraped_post_exists(&self.pool, profile_id, external_id).await
    }

    async fn insert_post(&self, profile_id: Uuid, post: &CanonicalPost) -> Result<i64, DbError> {
        postpulse_db::insert_scraped_post(&self.pool, profile_id, post).await
    }

    async fn insert_analysis(
        &self,
        post_id: i64,
        analysis: &PostAnalysis,
    ) -> Result<(), DbError> {
        postpulse_db::insert_post_analysis(&self.pool, post_id, analysis).await
    }
}
