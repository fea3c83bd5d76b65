// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook routes for Strava events.

use crate::models::{DispatchOutcome, InboundEvent, WebhookAck};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Webhook routes. `/import` is the callback path of existing subscriptions.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/webhook", get(verify).post(handle_event))
        .route("/import", get(verify).post(handle_event))
}

/// Strava webhook verification query params.
#[derive(Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.mode", default)]
    mode: Option<String>,
    #[serde(rename = "hub.challenge", default)]
    challenge: Option<String>,
    #[serde(rename = "hub.verify_token", default)]
    verify_token: Option<String>,
}

/// Verification response.
#[derive(Serialize)]
struct VerifyResponse {
    #[serde(rename = "hub.challenge")]
    challenge: String,
}

/// Verify webhook subscription (GET).
async fn verify(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerifyParams>,
) -> Response {
    let token_matches = params.verify_token.as_deref().is_some_and(|token| {
        token
            .as_bytes()
            .ct_eq(state.config.webhook_verify_token.as_bytes())
            .into()
    });

    if token_matches {
        tracing::info!(mode = ?params.mode, "Webhook subscription verified");
        (
            StatusCode::OK,
            Json(VerifyResponse {
                challenge: params.challenge.unwrap_or_default(),
            }),
        )
            .into_response()
    } else {
        tracing::warn!(
            mode = ?params.mode,
            "Webhook verification failed: invalid token"
        );
        (StatusCode::FORBIDDEN, "Forbidden: Invalid verify token").into_response()
    }
}

/// Handle incoming webhook events (POST).
///
/// Always answers 200 so Strava does not redeliver the event.
async fn handle_event(State(state): State<Arc<AppState>>, body: Bytes) -> Json<WebhookAck> {
    let event: InboundEvent = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(
                error = %e,
                payload = %String::from_utf8_lossy(&body),
                "Failed to parse webhook event"
            );
            return Json(DispatchOutcome::failed("Invalid event payload").into());
        }
    };

    let outcome = state.dispatcher.dispatch(&event).await;

    tracing::info!(
        object_id = event.object_id,
        processed = outcome.processed,
        skipped = outcome.skipped,
        "Webhook event acknowledged"
    );

    Json(outcome.into())
}
