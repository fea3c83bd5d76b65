// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authorization code exchange failed: {0}")]
    AuthExchange(String),

    #[error("Token refresh failed: {0}")]
    Refresh(String),

    #[error("Strava API error: {0}")]
    Fetch(String),

    #[error("Activity {activity_id} unavailable after {attempts} attempts: {last_error}")]
    FetchExhausted {
        activity_id: u64,
        attempts: u32,
        last_error: String,
    },

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message safe to hand back to webhook callers.
    ///
    /// Never contains upstream response bodies or credentials; the full error
    /// is only ever written to the log.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "Athlete is not connected",
            AppError::AuthExchange(_) | AppError::Refresh(_) => "Strava authorization failed",
            AppError::Fetch(_) | AppError::FetchExhausted { .. } => {
                "Failed to fetch activity from Strava"
            }
            AppError::Export(_) => "Failed to save activity to Notion database",
            AppError::Database(_) => "Credential store unavailable",
            AppError::BadRequest(_) => "Invalid request",
            AppError::Internal(_) => "Internal error",
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::AuthExchange(_) | AppError::Refresh(_) => {
                tracing::warn!(error = %self, "Strava authorization error");
                (StatusCode::BAD_GATEWAY, "strava_auth_error", None)
            }
            AppError::Fetch(_) | AppError::FetchExhausted { .. } => {
                tracing::warn!(error = %self, "Strava API error");
                (StatusCode::BAD_GATEWAY, "strava_error", None)
            }
            AppError::Export(_) => {
                tracing::warn!(error = %self, "Notion export error");
                (StatusCode::BAD_GATEWAY, "export_error", None)
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
