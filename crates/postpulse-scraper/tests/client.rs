//! Integration tests for `HarvestClient` using wiremock HTTP mocks.

use postpulse_scraper::HarvestClient;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> HarvestClient {
    HarvestClient::with_base_url("test-token", "linkedin-profile-posts", 30, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn start_profile_scrape_returns_run_id() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "data": { "id": "run-42", "status": "READY" }
    });

    Mock::given(method("POST"))
        .and(path("/v2/acts/linkedin-profile-posts/runs"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let run_id = client
        .start_profile_scrape("https://www.linkedin.com/in/someone", 50)
        .await
        .expect("request should succeed");

    assert_eq!(run_id.as_deref(), Some("run-42"));
}

#[tokio::test]
async fn start_profile_scrape_without_run_id_returns_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/acts/linkedin-profile-posts/runs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": {} })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let run_id = client
        .start_profile_scrape("https://www.linkedin.com/in/someone", 50)
        .await
        .expect("request should succeed");

    assert_eq!(run_id, None);
}

#[tokio::test]
async fn get_run_status_parses_dataset_id() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "data": {
            "id": "run-42",
            "status": "SUCCEEDED",
            "defaultDatasetId": "ds-7"
        }
    });

    Mock::given(method("GET"))
        .and(path("/v2/actor-runs/run-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let status = client.get_run_status("run-42").await.expect("should parse");

    assert_eq!(status.status, "SUCCEEDED");
    assert_eq!(status.dataset_id.as_deref(), Some("ds-7"));
}

#[tokio::test]
async fn get_run_status_with_empty_data_maps_to_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/actor-runs/run-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let status = client.get_run_status("run-9").await.expect("should parse");

    assert_eq!(status.status, "UNKNOWN");
    assert_eq!(status.dataset_id, None);
}

#[tokio::test]
async fn get_dataset_items_skips_malformed_records() {
    let server = MockServer::start().await;

    // The second item is a bare string, not a post object; it must be
    // skipped without failing the batch.
    let body = serde_json::json!([
        { "id": "p1", "content": "First post" },
        "garbage",
        { "id": "p2", "content": "Second post" }
    ]);

    Mock::given(method("GET"))
        .and(path("/v2/datasets/ds-7/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let posts = client.get_dataset_items("ds-7").await.expect("should parse");

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id.as_deref(), Some("p1"));
    assert_eq!(posts[1].id.as_deref(), Some("p2"));
}

#[tokio::test]
async fn server_error_surfaces_as_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/actor-runs/run-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.get_run_status("run-1").await;

    assert!(
        matches!(result, Err(postpulse_scraper::ScraperError::Http(_))),
        "expected Http error, got: {result:?}"
    );
}
