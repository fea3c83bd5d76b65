// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth onboarding: build the authorization URL and store the
//! credentials returned by the callback.

use crate::db::CredentialStore;
use crate::error::AppError;
use crate::models::CredentialRecord;
use crate::services::strava::StravaClient;
use crate::services::token::expiry_from_epoch;
use std::sync::Arc;

/// Scopes requested from Strava.
pub const REQUESTED_SCOPE: &str = "read,activity:read_all,activity:write";

/// Handles the OAuth authorization flow.
#[derive(Clone)]
pub struct AuthService {
    client: StravaClient,
    store: Arc<dyn CredentialStore>,
    redirect_uri: String,
}

impl AuthService {
    pub fn new(client: StravaClient, store: Arc<dyn CredentialStore>, redirect_uri: String) -> Self {
        Self {
            client,
            store,
            redirect_uri,
        }
    }

    /// URL the user is sent to in order to grant access.
    pub fn authorization_url(&self) -> String {
        self.client
            .authorization_url(&self.redirect_uri, REQUESTED_SCOPE)
    }

    /// Exchange the authorization code and persist the athlete's credentials.
    ///
    /// Returns the athlete ID.
    pub async fn handle_callback(&self, code: &str, scope: &str) -> Result<u64, AppError> {
        let bundle = self.client.exchange_code(code).await?;

        let athlete = bundle.athlete.ok_or_else(|| {
            AppError::AuthExchange("Token response did not include the athlete".to_string())
        })?;

        let record = CredentialRecord {
            athlete_id: athlete.id,
            access_token: bundle.access_token,
            refresh_token: bundle.refresh_token,
            expires_at: expiry_from_epoch(bundle.expires_at)?,
            scope: scope.to_string(),
        };

        self.store.upsert(&record).await?;

        tracing::info!(
            athlete_id = athlete.id,
            scope,
            "OAuth callback handled, credentials stored"
        );

        Ok(athlete.id)
    }
}
