//! Offline unit tests for figwatch-db pool configuration and row types.
//! These tests do not require a live database connection.

use figwatch_core::{AppConfig, Environment, ResponseShape};
use figwatch_db::{AlertRow, PoolConfig, PostRow};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

fn test_app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000),
        log_level: "info".to_string(),
        figures_path: PathBuf::from("./config/figures.yaml"),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        source_base_url: "https://api.example/v1".to_string(),
        source_api_key: "key".to_string(),
        source_page_size: 20,
        source_max_retries: 3,
        source_retry_delay_secs: 60,
        source_request_timeout_secs: 30,
        source_response_shape: ResponseShape::Flat,
        source_use_page_fallback: false,
        source_web_base_url: "https://syndication.example".to_string(),
        chat_base_url: "https://chat.example".to_string(),
        chat_api_key: String::new(),
        chat_model: "model".to_string(),
        textgen_base_url: "https://textgen.example".to_string(),
        textgen_api_key: String::new(),
        textgen_model: "model".to_string(),
        analyzer_request_timeout_secs: 10,
        notify_webhook_url: None,
        poll_interval_secs: 300,
        alert_threshold: 0.7,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&test_app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn pool_config_default_is_sane() {
    let pool_config = PoolConfig::default();
    assert!(pool_config.max_connections >= pool_config.min_connections);
    assert!(pool_config.acquire_timeout_secs > 0);
}

/// Compile-time smoke test: confirm that [`PostRow`] has all expected fields
/// with the correct types. No database required.
#[test]
fn post_row_has_expected_fields() {
    use chrono::Utc;

    let row = PostRow {
        id: 1_i64,
        platform_post_id: "999".to_string(),
        content: "Rates increased 25bps".to_string(),
        figure_id: 2_i64,
        posted_at: Some(Utc::now()),
        captured_at: Utc::now(),
        impact_score: None,
        likes: 0_i32,
        retweets: 0_i32,
        replies: 0_i32,
    };

    assert_eq!(row.platform_post_id, "999");
    assert!(row.impact_score.is_none());
}

#[test]
fn alert_row_has_expected_fields() {
    use chrono::Utc;

    let row = AlertRow {
        id: 1_i64,
        post_id: 5_i64,
        alert_type: "high_priority".to_string(),
        message: "High impact post".to_string(),
        sent_at: Utc::now(),
    };

    assert_eq!(row.alert_type, "high_priority");
    assert_eq!(row.post_id, 5);
}
