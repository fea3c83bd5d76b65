// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access token lifecycle: hand out a valid token, refreshing it first when
//! it is about to expire.

use crate::db::CredentialStore;
use crate::error::AppError;
use crate::services::strava::StravaClient;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Refresh when the access token has less than this left (1 hour), so it
/// cannot expire in the middle of a follow-up request.
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 60 * 60;

/// Hands out valid access tokens for connected athletes.
///
/// Every call reads the credential store; nothing is cached in memory.
#[derive(Clone)]
pub struct TokenService {
    client: StravaClient,
    store: Arc<dyn CredentialStore>,
}

impl TokenService {
    pub fn new(client: StravaClient, store: Arc<dyn CredentialStore>) -> Self {
        Self { client, store }
    }

    /// Get a valid access token for the given athlete.
    ///
    /// Fails with `NotFound` when the athlete never connected and with
    /// `Refresh` when Strava rejects the stored refresh token.
    pub async fn get_valid_access_token(&self, athlete_id: u64) -> Result<String, AppError> {
        let record = self
            .store
            .get(athlete_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Credentials for athlete {}", athlete_id)))?;

        let remaining = record.remaining(Utc::now());
        if remaining >= Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) {
            tracing::debug!(
                athlete_id,
                remaining_secs = remaining.num_seconds(),
                "Access token still valid"
            );
            return Ok(record.access_token);
        }

        tracing::info!(
            athlete_id,
            remaining_secs = remaining.num_seconds(),
            "Access token expiring, refreshing"
        );

        let bundle = self.client.refresh_token(&record.refresh_token).await?;
        let expires_at = expiry_from_epoch(bundle.expires_at)?;

        // The refresh token rotates too; losing it would lock the athlete out.
        self.store
            .update_tokens(
                athlete_id,
                &bundle.access_token,
                &bundle.refresh_token,
                expires_at,
            )
            .await?;

        tracing::info!(athlete_id, expires_at = %expires_at, "Token refreshed and stored");
        Ok(bundle.access_token)
    }
}

/// Convert Strava's epoch-seconds expiry into an absolute timestamp.
pub fn expiry_from_epoch(expires_at: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::from_timestamp(expires_at, 0).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("Invalid token expiry: {}", expires_at))
    })
}
