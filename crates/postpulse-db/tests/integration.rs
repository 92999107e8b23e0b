//! Offline unit tests for postpulse-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chrono::Utc;
use postpulse_core::{AppConfig, Environment};
use postpulse_db::{AnalyzedPostRow, PoolConfig, ProfileRow};
use uuid::Uuid;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        harvest_api_token: "token".to_string(),
        harvest_base_url: "https://api.harvestapi.dev".to_string(),
        harvest_actor: "linkedin-profile-posts".to_string(),
        harvest_request_timeout_secs: 30,
        poll_interval_secs: 5,
        max_poll_attempts: 60,
        default_max_posts: 50,
        dedupe_rescraped_posts: false,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn pool_config_default_is_sane() {
    let config = PoolConfig::default();
    assert!(config.max_connections >= config.min_connections);
    assert!(config.acquire_timeout_secs > 0);
}

/// Compile-time smoke test: confirm that [`ProfileRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn profile_row_has_expected_fields() {
    let row = ProfileRow {
        id: Uuid::new_v4(),
        display_name: Some("Jordan Founder".to_string()),
        linkedin_url: "https://www.linkedin.com/in/jordan".to_string(),
        scrape_status: "pending".to_string(),
        last_scraped_at: None,
        created_at: Utc::now(),
    };

    assert_eq!(row.scrape_status, "pending");
    assert!(row.last_scraped_at.is_none());
}

#[test]
fn analyzed_post_row_analysis_columns_are_nullable() {
    let row = AnalyzedPostRow {
        id: 1,
        profile_id: Uuid::new_v4(),
        external_id: "p1".to_string(),
        url: String::new(),
        content: "hello".to_string(),
        posted_at: None,
        likes: 0,
        comments: 0,
        reposts: 0,
        has_images: false,
        num_images: 0,
        hook: None,
        word_count: None,
        has_list_format: None,
        topic_category: None,
        mentioned_companies: None,
        cta: None,
        created_at: Utc::now(),
    };

    // A post whose analysis insert failed still lists with NULL analysis.
    assert!(row.hook.is_none());
    assert!(row.topic_category.is_none());
}
