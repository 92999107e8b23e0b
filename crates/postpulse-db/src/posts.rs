//! Database operations for the `scraped_posts` and `post_analysis` tables.

use chrono::{DateTime, Utc};
use postpulse_core::{CanonicalPost, PostAnalysis};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A scraped post joined with its analysis, as consumed by the dashboard.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalyzedPostRow {
    pub id: i64,
    pub profile_id: Uuid,
    pub external_id: String,
    pub url: String,
    pub content: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub likes: i64,
    pub comments: i64,
    pub reposts: i64,
    pub has_images: bool,
    pub num_images: i64,
    pub hook: Option<String>,
    pub word_count: Option<i64>,
    pub has_list_format: Option<bool>,
    pub topic_category: Option<String>,
    pub mentioned_companies: Option<Vec<String>>,
    pub cta: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert a canonical post linked to its profile and return the generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_scraped_post(
    pool: &PgPool,
    profile_id: Uuid,
    post: &CanonicalPost,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO scraped_posts \
             (profile_id, external_id, url, content, posted_at, \
              likes, comments, reposts, has_images, num_images) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING id",
    )
    .bind(profile_id)
    .bind(&post.external_id)
    .bind(&post.url)
    .bind(&post.content)
    .bind(post.posted_at)
    .bind(post.likes)
    .bind(post.comments)
    .bind(post.reposts)
    .bind(post.has_images)
    .bind(post.image_count)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Insert the analysis row linked to a scraped post.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_post_analysis(
    pool: &PgPool,
    scraped_post_id: i64,
    analysis: &PostAnalysis,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO post_analysis \
             (scraped_post_id, hook, word_count, has_list_format, \
              topic_category, mentioned_companies, cta) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(scraped_post_id)
    .bind(&analysis.hook)
    .bind(analysis.word_count)
    .bind(analysis.has_list_format)
    .bind(analysis.topic_category.as_str())
    .bind(&analysis.mentioned_companies)
    .bind(&analysis.call_to_action)
    .execute(pool)
    .await?;

    Ok(())
}

/// Check whether a post with this provider id already exists for the profile.
///
/// Used by the optional dedupe policy; posts with an empty `external_id`
/// never count as duplicates.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn scraped_post_exists(
    pool: &PgPool,
    profile_id: Uuid,
    external_id: &str,
) -> Result<bool, DbError> {
    if external_id.is_empty() {
        return Ok(false);
    }

    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS ( \
             SELECT 1 FROM scraped_posts \
             WHERE profile_id = $1 AND external_id = $2 \
         )",
    )
    .bind(profile_id)
    .bind(external_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// List a profile's posts joined with their analysis, newest first.
///
/// Posts whose analysis insert was skipped still appear, with the analysis
/// columns `NULL`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_posts_with_analysis(
    pool: &PgPool,
    profile_id: Uuid,
    limit: i64,
) -> Result<Vec<AnalyzedPostRow>, DbError> {
    let rows = sqlx::query_as::<_, AnalyzedPostRow>(
        "SELECT p.id, p.profile_id, p.external_id, p.url, p.content, p.posted_at, \
                p.likes, p.comments, p.reposts, p.has_images, p.num_images, \
                a.hook, a.word_count, a.has_list_format, a.topic_category, \
                a.mentioned_companies, a.cta, p.created_at \
         FROM scraped_posts p \
         LEFT JOIN post_analysis a ON a.scraped_post_id = p.id \
         WHERE p.profile_id = $1 \
         ORDER BY p.created_at DESC, p.id DESC \
         LIMIT $2",
    )
    .bind(profile_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
