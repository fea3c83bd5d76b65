// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use strava_notion_sync::config::Config;
use strava_notion_sync::db::MemoryCredentialStore;
use strava_notion_sync::models::CredentialRecord;
use strava_notion_sync::routes::create_router;
use strava_notion_sync::services::{NotionExporter, Sleeper, StravaClient};
use strava_notion_sync::AppState;
use wiremock::MockServer;

/// Sleeper that records requested delays instead of waiting.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

#[allow(dead_code)]
impl RecordingSleeper {
    pub fn delays_ms(&self) -> Vec<u128> {
        self.delays
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.as_millis())
            .collect()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

/// Config pointing every upstream at the mock server.
#[allow(dead_code)]
pub fn test_config(server: &MockServer) -> Config {
    Config {
        strava_api_url: format!("{}/api/v3", server.uri()),
        strava_oauth_url: format!("{}/oauth", server.uri()),
        notion_api_url: server.uri(),
        ..Config::default()
    }
}

/// Strava client talking to the mock server, with recorded sleeps.
#[allow(dead_code)]
pub fn test_strava_client(server: &MockServer, sleeper: &RecordingSleeper) -> StravaClient {
    StravaClient::from_config(&test_config(server)).with_sleeper(Arc::new(sleeper.clone()))
}

/// Credential record expiring `expires_in` from now.
#[allow(dead_code)]
pub fn credential(athlete_id: u64, expires_in: ChronoDuration) -> CredentialRecord {
    CredentialRecord {
        athlete_id,
        access_token: "stored_access_token".to_string(),
        refresh_token: "stored_refresh_token".to_string(),
        expires_at: Utc::now() + expires_in,
        scope: "read,activity:read_all".to_string(),
    }
}

/// Token endpoint response body.
#[allow(dead_code)]
pub fn token_json(access_token: &str, refresh_token: &str, expires_at: i64) -> Value {
    json!({
        "token_type": "Bearer",
        "access_token": access_token,
        "refresh_token": refresh_token,
        "expires_at": expires_at,
        "expires_in": 21600
    })
}

/// Detailed activity response body.
#[allow(dead_code)]
pub fn activity_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "Run",
        "sport_type": "Run",
        "distance": 5012.3,
        "moving_time": 1520,
        "elapsed_time": 1600,
        "total_elevation_gain": 41.2,
        "start_date": "2026-10-16T13:30:00Z",
        "start_date_local": "2026-10-16T06:30:00Z",
        "timezone": "(GMT-08:00) America/Los_Angeles",
        "average_speed": 3.297,
        "max_speed": 4.1
    })
}

/// Everything a route-level test needs to poke at.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub store: MemoryCredentialStore,
    pub sleeper: RecordingSleeper,
}

/// Create a test app with every upstream served by `server`.
#[allow(dead_code)]
pub fn create_test_app(server: &MockServer) -> TestApp {
    let config = test_config(server);
    let sleeper = RecordingSleeper::default();
    let store = MemoryCredentialStore::new();
    let strava = test_strava_client(server, &sleeper);
    let exporter = NotionExporter::from_config(&config);

    let state = Arc::new(AppState::new(
        config,
        strava,
        Arc::new(store.clone()),
        Arc::new(exporter),
    ));

    TestApp {
        router: create_router(state.clone()),
        state,
        store,
        sleeper,
    }
}
