// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Integration tests for webhook handling.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Duration;
use serde_json::{json, Value};
use strava_notion_sync::db::CredentialStore;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{activity_json, create_test_app, credential};

async fn post_event(app: axum::Router, event: Value) -> (StatusCode, Value) {
    post_raw(app, serde_json::to_string(&event).unwrap()).await
}

async fn post_raw(app: axum::Router, body: String) -> (StatusCode, Value) {
    post_to(app, "/webhook", body).await
}

async fn post_to(app: axum::Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn event(object_type: &str, aspect_type: &str) -> Value {
    json!({
        "aspect_type": aspect_type,
        "event_time": 1516126040,
        "object_id": 999,
        "object_type": object_type,
        "owner_id": 42,
        "subscription_id": 120475
    })
}

/// Fail the test if Strava or Notion is contacted at all.
async fn forbid_upstream_calls(server: &MockServer) {
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_webhook_verification() {
    let server = MockServer::start().await;
    let app = create_test_app(&server);

    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/webhook?hub.mode=subscribe&hub.challenge=test_challenge_123&hub.verify_token=test_verify_token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["hub.challenge"], "test_challenge_123");
}

#[tokio::test]
async fn test_webhook_verification_wrong_token() {
    let server = MockServer::start().await;
    let app = create_test_app(&server);

    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/webhook?hub.mode=subscribe&hub.challenge=abc&hub.verify_token=wrong_token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_webhook_verification_missing_token() {
    let server = MockServer::start().await;
    let app = create_test_app(&server);

    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/webhook?hub.challenge=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_activity_exported_to_notion() {
    let server = MockServer::start().await;
    let app = create_test_app(&server);
    app.store
        .upsert(&credential(42, Duration::hours(4)))
        .await
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/999"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/activities/999"))
        .and(header("authorization", "Bearer stored_access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(activity_json(999, "Morning Run")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/pages"))
        .and(header("Notion-Version", "2022-06-28"))
        .and(body_partial_json(json!({
            "parent": {"database_id": "test_database_id"},
            "properties": {"Activity ID": {"number": 999}}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"object": "page", "id": "page-abc"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (status, ack) = post_event(app.router, event("activity", "create")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ack,
        json!({
            "received": true,
            "processed": true,
            "skipped": false,
            "activity": "Morning Run",
            "page_id": "page-abc"
        })
    );
    assert_eq!(app.sleeper.delays_ms(), vec![2000]);
}

#[tokio::test]
async fn test_export_failure_still_acknowledged() {
    let server = MockServer::start().await;
    let app = create_test_app(&server);
    app.store
        .upsert(&credential(42, Duration::hours(4)))
        .await
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(activity_json(999, "Morning Run")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/pages"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "object": "error",
            "code": "validation_error",
            "message": "Distance is not a property that exists."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, ack) = post_event(app.router, event("activity", "create")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["received"], true);
    assert_eq!(ack["processed"], true);
    assert_eq!(ack["activity"], "Morning Run");
    assert_eq!(
        ack["export_error"],
        "Failed to save activity to Notion database"
    );
    assert!(ack.get("page_id").is_none());
    assert!(ack.get("error").is_none());
}

#[tokio::test]
async fn test_create_for_unknown_athlete_reports_error() {
    let server = MockServer::start().await;
    forbid_upstream_calls(&server).await;
    let app = create_test_app(&server);

    let (status, ack) = post_event(app.router, event("activity", "create")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ack,
        json!({
            "received": true,
            "processed": false,
            "skipped": false,
            "error": "Athlete is not connected"
        })
    );
}

#[tokio::test]
async fn test_fetch_exhausted_reports_error() {
    let server = MockServer::start().await;
    let app = create_test_app(&server);
    app.store
        .upsert(&credential(42, Duration::hours(4)))
        .await
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v3/activities/999"))
        .respond_with(ResponseTemplate::new(404))
        .expect(5)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/pages"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (status, ack) = post_event(app.router, event("activity", "create")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["processed"], false);
    assert_eq!(ack["error"], "Failed to fetch activity from Strava");
    assert_eq!(app.sleeper.delays_ms(), vec![2000, 4000, 8000, 16000]);
}

#[tokio::test]
async fn test_update_activity_skipped_without_network() {
    let server = MockServer::start().await;
    forbid_upstream_calls(&server).await;
    let app = create_test_app(&server);

    let mut update = event("activity", "update");
    update["updates"] = json!({"title": "New Title"});

    let (status, ack) = post_event(app.router, update).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ack,
        json!({"received": true, "processed": false, "skipped": true})
    );
}

#[tokio::test]
async fn test_delete_activity_skipped() {
    let server = MockServer::start().await;
    forbid_upstream_calls(&server).await;
    let app = create_test_app(&server);

    let (status, ack) = post_event(app.router, event("activity", "delete")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["skipped"], true);
    assert_eq!(ack["processed"], false);
}

#[tokio::test]
async fn test_athlete_deauthorize_skipped() {
    let server = MockServer::start().await;
    forbid_upstream_calls(&server).await;
    let app = create_test_app(&server);

    let mut deauth = event("athlete", "update");
    deauth["object_id"] = json!(42);
    deauth["updates"] = json!({"authorized": "false"});

    let (status, ack) = post_event(app.router, deauth).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["skipped"], true);
}

#[tokio::test]
async fn test_unknown_event_type_skipped() {
    let server = MockServer::start().await;
    forbid_upstream_calls(&server).await;
    let app = create_test_app(&server);

    let (status, ack) = post_event(app.router, event("unknown_object", "unknown_aspect")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ack,
        json!({"received": true, "processed": false, "skipped": true})
    );
}

#[tokio::test]
async fn test_malformed_payload_acknowledged() {
    let server = MockServer::start().await;
    forbid_upstream_calls(&server).await;
    let app = create_test_app(&server);

    let (status, ack) = post_raw(app.router.clone(), "not json".to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["received"], true);
    assert_eq!(ack["error"], "Invalid event payload");

    let (status, ack) = post_event(app.router, json!({"object_type": "activity"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["error"], "Invalid event payload");
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = MockServer::start().await;
    let app = create_test_app(&server);

    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_import_path_verification() {
    let server = MockServer::start().await;
    let app = create_test_app(&server);

    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/import?hub.mode=subscribe&hub.challenge=legacy_42&hub.verify_token=test_verify_token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["hub.challenge"], "legacy_42");
}

#[tokio::test]
async fn test_import_path_accepts_events() {
    let server = MockServer::start().await;
    forbid_upstream_calls(&server).await;
    let app = create_test_app(&server);

    let body = serde_json::to_string(&event("activity", "delete")).unwrap();
    let (status, ack) = post_to(app.router, "/import", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["received"], true);
    assert_eq!(ack["skipped"], true);
}
