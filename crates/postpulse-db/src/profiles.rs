//! Database operations for the `scraped_profiles` table.

use chrono::{DateTime, Utc};
use postpulse_core::ScrapeStatus;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `scraped_profiles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub linkedin_url: String,
    pub scrape_status: String,
    pub last_scraped_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insert a new profile and return its row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_profile(
    pool: &PgPool,
    display_name: Option<&str>,
    linkedin_url: &str,
) -> Result<ProfileRow, DbError> {
    let row = sqlx::query_as::<_, ProfileRow>(
        "INSERT INTO scraped_profiles (display_name, linkedin_url) \
         VALUES ($1, $2) \
         RETURNING id, display_name, linkedin_url, scrape_status, last_scraped_at, created_at",
    )
    .bind(display_name)
    .bind(linkedin_url)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetch a profile by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_profile(pool: &PgPool, profile_id: Uuid) -> Result<Option<ProfileRow>, DbError> {
    let row = sqlx::query_as::<_, ProfileRow>(
        "SELECT id, display_name, linkedin_url, scrape_status, last_scraped_at, created_at \
         FROM scraped_profiles \
         WHERE id = $1",
    )
    .bind(profile_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Atomically move a profile into `scraping` status.
///
/// Compare-and-swap on `scrape_status`: the update only applies when the
/// profile exists and is not already `scraping`, so two concurrent runs for
/// the same profile cannot both claim it. Returns `true` when the claim
/// succeeded.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn claim_profile_for_scrape(pool: &PgPool, profile_id: Uuid) -> Result<bool, DbError> {
    let result = sqlx::query(
        "UPDATE scraped_profiles \
         SET scrape_status = 'scraping' \
         WHERE id = $1 AND scrape_status <> 'scraping'",
    )
    .bind(profile_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Set a profile's scrape status.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the profile does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_profile_scrape_status(
    pool: &PgPool,
    profile_id: Uuid,
    status: ScrapeStatus,
) -> Result<(), DbError> {
    let result = sqlx::query("UPDATE scraped_profiles SET scrape_status = $2 WHERE id = $1")
        .bind(profile_id)
        .bind(status.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Mark a profile `completed` and stamp `last_scraped_at`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the profile does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn mark_profile_scrape_completed(
    pool: &PgPool,
    profile_id: Uuid,
    scraped_at: DateTime<Utc>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE scraped_profiles \
         SET scrape_status = 'completed', last_scraped_at = $2 \
         WHERE id = $1",
    )
    .bind(profile_id)
    .bind(scraped_at)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
