// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase (PostgREST) credential store.
//!
//! Credentials live in the `athletes` table with `athlete_id` as the
//! conflict key. All operations are single REST calls; PostgREST errors are
//! reported as `AppError::Database`.

use crate::config::SupabaseConfig;
use crate::db::{tables, CredentialStore};
use crate::error::AppError;
use crate::models::CredentialRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Credential store backed by a Supabase table.
#[derive(Clone)]
pub struct SupabaseCredentialStore {
    http: reqwest::Client,
    rest_url: String,
    key: String,
}

/// Columns rewritten on every token refresh.
#[derive(Serialize)]
struct TokenUpdate<'a> {
    access_token: &'a str,
    refresh_token: &'a str,
    expires_at: DateTime<Utc>,
}

impl SupabaseCredentialStore {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            rest_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            key: config.key.clone(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.rest_url, tables::ATHLETES)
    }

    /// Attach the service key headers PostgREST expects.
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    /// Check response status and parse JSON body.
    async fn check_response_json<T: for<'de> serde::Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Database(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Database(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl CredentialStore for SupabaseCredentialStore {
    async fn get(&self, athlete_id: u64) -> Result<Option<CredentialRecord>, AppError> {
        let response = self
            .authorized(self.http.get(self.table_url()))
            .query(&[
                ("athlete_id", format!("eq.{}", athlete_id)),
                ("select", "*".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let rows: Vec<CredentialRecord> = Self::check_response_json(response).await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert(&self, record: &CredentialRecord) -> Result<CredentialRecord, AppError> {
        let response = self
            .authorized(self.http.post(self.table_url()))
            .query(&[("on_conflict", "athlete_id")])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(record)
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let rows: Vec<CredentialRecord> = Self::check_response_json(response).await?;
        rows.into_iter().next().ok_or_else(|| {
            AppError::Database(format!(
                "Upsert for athlete {} returned no rows",
                record.athlete_id
            ))
        })
    }

    async fn update_tokens(
        &self,
        athlete_id: u64,
        access_token: &str,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let response = self
            .authorized(self.http.patch(self.table_url()))
            .query(&[("athlete_id", format!("eq.{}", athlete_id))])
            .json(&TokenUpdate {
                access_token,
                refresh_token,
                expires_at,
            })
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Database(format!("HTTP {}: {}", status, body)));
        }

        Ok(())
    }
}
