use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use postpulse_ingest::{run_scrape, IngestError, PgStore};

use super::{map_db_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ScrapeRequest {
    pub profile_id: Uuid,
    pub profile_url: String,
    pub max_posts: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ScrapeResponse {
    pub success: bool,
    pub posts_scraped: usize,
    pub posts_stored: usize,
}

/// Trigger a scrape run for a profile and block until it finishes.
///
/// The run polls the provider for up to the configured ceiling, so this
/// request can take minutes; the dashboard fires it and then follows the
/// status endpoint.
pub(super) async fn scrape_profile(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    if request.profile_url.trim().is_empty() {
        return Err(ApiError::bad_request("Missing profileUrl"));
    }

    let profile = postpulse_db::get_profile(&state.pool, request.profile_id)
        .await
        .map_err(|e| map_db_error(&e))?;
    if profile.is_none() {
        return Err(ApiError::not_found("Profile not found"));
    }

    let max_posts = request.max_posts.unwrap_or(state.default_max_posts);
    let store = PgStore::new(state.pool.clone());

    let outcome = run_scrape(
        &state.scraper,
        &store,
        &state.ingest,
        request.profile_id,
        &request.profile_url,
        max_posts,
    )
    .await
    .map_err(map_ingest_error)?;

    Ok(Json(ScrapeResponse {
        success: true,
        posts_scraped: outcome.posts_scraped,
        posts_stored: outcome.posts_stored,
    }))
}

fn map_ingest_error(error: IngestError) -> ApiError {
    match error {
        IngestError::AlreadyRunning => {
            ApiError::conflict("A scrape is already in progress for this profile")
        }
        IngestError::JobStart => ApiError::internal("Failed to start scrape"),
        IngestError::JobFailed { status } => {
            ApiError::internal(format!("Scrape failed with status: {status}"))
        }
        IngestError::Scraper(e) => {
            tracing::error!(error = %e, "provider request failed");
            ApiError::internal("Failed to scrape profile")
        }
        IngestError::Db(e) => map_db_error(&e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StatusQuery {
    pub profile_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StatusResponse {
    pub status: String,
    pub last_scraped: Option<DateTime<Utc>>,
}

/// Read-only scrape status for the dashboard's polling loop.
pub(super) async fn scrape_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    let profile = postpulse_db::get_profile(&state.pool, query.profile_id)
        .await
        .map_err(|e| map_db_error(&e))?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    Ok(Json(StatusResponse {
        status: profile.scrape_status,
        last_scraped: profile.last_scraped_at,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateProfileRequest {
    pub display_name: Option<String>,
    pub linkedin_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProfileResponse {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub linkedin_url: String,
    pub scrape_status: String,
    pub last_scraped_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

pub(super) async fn create_profile(
    State(state): State<AppState>,
    Json(request): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    if request.linkedin_url.trim().is_empty() {
        return Err(ApiError::bad_request("Missing linkedinUrl"));
    }

    let row = postpulse_db::insert_profile(
        &state.pool,
        request.display_name.as_deref(),
        request.linkedin_url.trim(),
    )
    .await
    .map_err(|e| map_db_error(&e))?;

    Ok((
        StatusCode::CREATED,
        Json(ProfileResponse {
            id: row.id,
            display_name: row.display_name,
            linkedin_url: row.linkedin_url,
            scrape_status: row.scrape_status,
            last_scraped_at: row.last_scraped_at,
            created_at: row.created_at,
        }),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PostsQuery {
    pub profile_id: Uuid,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PostItem {
    pub id: i64,
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
}

/// List a profile's analyzed posts, newest first, for the analytics screens.
pub(super) async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostsQuery>,
) -> Result<Json<Vec<PostItem>>, ApiError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let rows = postpulse_db::list_posts_with_analysis(&state.pool, query.profile_id, limit)
        .await
        .map_err(|e| map_db_error(&e))?;

    let items = rows
        .into_iter()
        .map(|row| PostItem {
            id: row.id,
            external_id: row.external_id,
            url: row.url,
            content: row.content,
            posted_at: row.posted_at,
            likes: row.likes,
            comments: row.comments,
            reposts: row.reposts,
            has_images: row.has_images,
            num_images: row.num_images,
            hook: row.hook,
            word_count: row.word_count,
            has_list_format: row.has_list_format,
            topic_category: row.topic_category,
            mentioned_companies: row.mentioned_companies,
            cta: row.cta,
        })
        .collect();

    Ok(Json(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrape_request_accepts_camel_case_body() {
        let body = serde_json::json!({
            "profileId": "7d7e8a3a-51c4-4a3e-9a3e-0a6f37bd9b52",
            "profileUrl": "https://www.linkedin.com/in/founder",
            "maxPosts": 25
        });
        let request: ScrapeRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.max_posts, Some(25));
        assert_eq!(request.profile_url, "https://www.linkedin.com/in/founder");
    }

    #[test]
    fn scrape_response_uses_camel_case_keys() {
        let response = ScrapeResponse {
            success: true,
            posts_scraped: 5,
            posts_stored: 4,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": true, "postsScraped": 5, "postsStored": 4 })
        );
    }

    #[test]
    fn status_response_uses_camel_case_keys() {
        let response = StatusResponse {
            status: "completed".to_string(),
            last_scraped: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "completed", "lastScraped": null })
        );
    }
}
