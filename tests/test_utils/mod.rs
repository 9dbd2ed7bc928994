//! Test utilities for integration tests
use std::env;
use std::fs;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use axum::Router;
use chrono_tz::Tz;

use agenda::api::AppState;
use agenda::api::app;
use agenda::calendar::WorkingHours;
use agenda::config::AppConfig;
use agenda::db::{async_db, initialize_db, upsert_refresh_token};

pub const TEST_ACCOUNTS: [&str; 2] = ["work@test.com", "personal@test.com"];

/// Creates a test application router backed by a throwaway sqlite db,
/// with the Google Calendar API, OAuth token endpoint, and LLM host
/// pointed at the given (mock) URLs. Both test accounts get a stored
/// refresh token so backends can "authenticate" against the mock.
pub async fn test_app(gcal_base_url: &str, token_url: &str, llm_hostname: &str) -> Router {
    // Unique directory per test to avoid db collisions
    let ts = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
        .to_string();
    let dir = env::temp_dir().join(format!("agenda-test-{}", ts));
    fs::create_dir_all(&dir).expect("Failed to create test directory");
    let db_path = dir.display().to_string();

    let db = async_db(&db_path)
        .await
        .expect("Failed to connect to async db");
    db.call(|conn| {
        initialize_db(conn).expect("Failed to initialize db");
        Ok(())
    })
    .await
    .unwrap();

    for account in TEST_ACCOUNTS {
        upsert_refresh_token(&db, account, "test-refresh-token")
            .await
            .expect("Failed to seed refresh token");
    }

    let app_config = AppConfig {
        db_path,
        calendar_accounts: TEST_ACCOUNTS.iter().map(|s| s.to_string()).collect(),
        timezone: Tz::UTC,
        working_hours: WorkingHours::new(8, 22),
        prefs_path: None,
        gcal_api_base_url: gcal_base_url.to_string(),
        google_token_url: token_url.to_string(),
        google_client_id: String::from("test_client_id"),
        google_client_secret: String::from("test_client_secret"),
        openai_model: String::from("gpt-4.1-mini"),
        openai_api_hostname: llm_hostname.to_string(),
        openai_api_key: String::from("test-api-key"),
    };
    let app_state = AppState::new(db, app_config);
    app(Arc::new(RwLock::new(app_state)))
}

/// Mock the OAuth refresh-token exchange with a static access token.
pub fn mock_token_endpoint(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
        .mock("POST", "/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "test-access-token", "expires_in": 3600}"#)
        .create()
}

/// Mock the calendar list endpoint with a fixed items payload.
pub fn mock_list_events(server: &mut mockito::ServerGuard, items_json: &str) -> mockito::Mock {
    server
        .mock("GET", "/calendars/primary/events")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"items": {}}}"#, items_json))
        .create()
}
