//! HTTP client for the Harvest actor-run API.
//!
//! A profile scrape is an actor run: submit the run, poll it until it reaches
//! a terminal status, then fetch its result dataset. All requests carry a
//! bearer token. Responses arrive wrapped in a `{"data": {...}}` envelope.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::ScraperError;
use crate::types::RawPost;

const DEFAULT_BASE_URL: &str = "https://api.harvestapi.dev";

/// Status of a submitted actor run.
#[derive(Debug, Clone)]
pub struct RunStatus {
    /// Provider status string: `"RUNNING"`, `"SUCCEEDED"`, or another
    /// terminal value (`"FAILED"`, `"ABORTED"`, `"TIMED-OUT"`, ...).
    pub status: String,
    /// Handle for the run's result dataset, present once the run produced one.
    pub dataset_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunEnvelope {
    #[serde(default)]
    data: Option<RunData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunData {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    default_dataset_id: Option<String>,
}

/// Client for the Harvest scraping provider.
///
/// Use [`HarvestClient::new`] for production or
/// [`HarvestClient::with_base_url`] to point at a mock server in tests.
pub struct HarvestClient {
    client: Client,
    token: String,
    actor: String,
    base_url: Url,
}

impl HarvestClient {
    /// Creates a new client pointed at the production Harvest API.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, actor: &str, timeout_secs: u64) -> Result<Self, ScraperError> {
        Self::with_base_url(token, actor, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScraperError::Api`] if `base_url` is not
    /// a valid URL.
    pub fn with_base_url(
        token: &str,
        actor: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("postpulse/0.1 (post-ingestion)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join() appends path segments instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ScraperError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            token: token.to_owned(),
            actor: actor.to_owned(),
            base_url,
        })
    }

    /// Submits a profile scrape run and returns the run id, if one was issued.
    ///
    /// Returns `Ok(None)` when the provider accepts the request but issues no
    /// run id — callers treat that as a job-start failure.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] on network failure or non-2xx HTTP status.
    /// - [`ScraperError::Deserialize`] if the response envelope is malformed.
    pub async fn start_profile_scrape(
        &self,
        profile_url: &str,
        max_posts: u32,
    ) -> Result<Option<String>, ScraperError> {
        let url = self.build_url(&format!("v2/acts/{}/runs", self.actor))?;
        let body = serde_json::json!({
            "profileUrls": [profile_url],
            "maxPosts": max_posts,
            "includeReposts": false,
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let raw = response.json::<serde_json::Value>().await?;
        let envelope: RunEnvelope =
            serde_json::from_value(raw).map_err(|e| ScraperError::Deserialize {
                context: format!("start run for {profile_url}"),
                source: e,
            })?;

        Ok(envelope.data.and_then(|d| d.id))
    }

    /// Fetches the current status of an actor run.
    ///
    /// A missing status field maps to `"UNKNOWN"` so the poll loop always has
    /// a comparable string.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] on network failure or non-2xx HTTP status.
    /// - [`ScraperError::Deserialize`] if the response envelope is malformed.
    pub async fn get_run_status(&self, run_id: &str) -> Result<RunStatus, ScraperError> {
        let url = self.build_url(&format!("v2/actor-runs/{run_id}"))?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;

        let raw = response.json::<serde_json::Value>().await?;
        let envelope: RunEnvelope =
            serde_json::from_value(raw).map_err(|e| ScraperError::Deserialize {
                context: format!("run status for {run_id}"),
                source: e,
            })?;

        let data = envelope.data.unwrap_or_default();
        Ok(RunStatus {
            status: data.status.unwrap_or_else(|| "UNKNOWN".to_string()),
            dataset_id: data.default_dataset_id,
        })
    }

    /// Fetches all raw posts from a run's result dataset.
    ///
    /// Items are parsed individually; any item that fails to deserialize is
    /// logged and skipped rather than failing the whole batch, since dataset
    /// contents are untrusted.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] on network failure or non-2xx HTTP status.
    /// - [`ScraperError::Deserialize`] if the response is not a JSON array.
    pub async fn get_dataset_items(&self, dataset_id: &str) -> Result<Vec<RawPost>, ScraperError> {
        let url = self.build_url(&format!("v2/datasets/{dataset_id}/items"))?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;

        let items: Vec<serde_json::Value> =
            response
                .json()
                .await
                .map_err(|e| ScraperError::Api(format!(
                    "dataset {dataset_id} items are not a JSON array: {e}"
                )))?;

        let total = items.len();
        let mut posts = Vec::with_capacity(total);
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<RawPost>(item) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!(
                        dataset_id,
                        index,
                        error = %e,
                        "skipping malformed dataset item"
                    );
                }
            }
        }

        if posts.len() < total {
            tracing::warn!(
                dataset_id,
                total,
                parsed = posts.len(),
                "some dataset items were malformed and skipped"
            );
        }

        Ok(posts)
    }

    fn build_url(&self, path: &str) -> Result<Url, ScraperError> {
        self.base_url
            .join(path)
            .map_err(|e| ScraperError::Api(format!("invalid URL path '{path}': {e}")))
    }
}
