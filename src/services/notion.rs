// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Export of fetched activities to a Notion database.

use crate::config::Config;
use crate::error::AppError;
use crate::models::NotionActivity;
use crate::services::strava::StravaActivity;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Notion API version the page payloads are written against.
const NOTION_VERSION: &str = "2022-06-28";

/// Destination for fetched activities.
#[async_trait]
pub trait ActivityExporter: Send + Sync {
    /// Persist the activity and return the destination record ID.
    async fn save(&self, activity: &StravaActivity) -> Result<String, AppError>;
}

/// Writes activities as pages of a Notion database.
#[derive(Clone)]
pub struct NotionExporter {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    database_id: String,
}

/// The part of a Notion page/database response we care about.
#[derive(Debug, Deserialize)]
struct NotionObject {
    id: String,
}

impl NotionExporter {
    pub fn new(base_url: &str, api_key: String, database_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            database_id,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.notion_api_url,
            config.notion_api_key.clone(),
            config.notion_database_id.clone(),
        )
    }

    /// Check that the database exists and the integration can read it.
    pub async fn verify_database(&self) -> bool {
        let url = format!("{}/v1/databases/{}", self.base_url, self.database_id);
        let result = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!(database_id = %self.database_id, "Notion database is accessible");
                true
            }
            Ok(response) => {
                tracing::warn!(
                    database_id = %self.database_id,
                    status = %response.status(),
                    "Notion database is not accessible"
                );
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to reach Notion");
                false
            }
        }
    }
}

#[async_trait]
impl ActivityExporter for NotionExporter {
    async fn save(&self, activity: &StravaActivity) -> Result<String, AppError> {
        let record = NotionActivity::from_strava(activity);
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": record.properties(),
        });

        let response = self
            .http
            .post(format!("{}/v1/pages", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Export(format!("Notion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Export(format!("HTTP {}: {}", status, body)));
        }

        let page: NotionObject = response
            .json()
            .await
            .map_err(|e| AppError::Export(format!("JSON parse error: {}", e)))?;

        tracing::info!(activity_id = activity.id, page_id = %page.id, "Activity saved to Notion");
        Ok(page.id)
    }
}
