// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for OAuth token exchange and activity fetching.
//!
//! Handles:
//! - Authorization code exchange and token refresh (no retry)
//! - Activity fetching with exponential backoff while a new activity
//!   propagates through Strava's API

use crate::config::{Config, DEFAULT_STRAVA_API_URL, DEFAULT_STRAVA_OAUTH_URL};
use crate::error::AppError;
use crate::services::retry::{RetryPolicy, Sleeper, TokioSleeper};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_STRAVA_API_URL.to_string(),
            oauth_url: DEFAULT_STRAVA_OAUTH_URL.to_string(),
            client_id,
            client_secret,
            retry: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Create a client from application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
        )
        .with_base_urls(&config.strava_api_url, &config.strava_oauth_url)
        .with_retry_policy(RetryPolicy::new(
            config.fetch_max_attempts,
            config.fetch_initial_delay,
        ))
    }

    /// Point the client at different API and OAuth hosts.
    pub fn with_base_urls(mut self, api_url: &str, oauth_url: &str) -> Self {
        self.base_url = api_url.trim_end_matches('/').to_string();
        self.oauth_url = oauth_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Build the URL that starts the OAuth authorization flow.
    pub fn authorization_url(&self, redirect_uri: &str, scope: &str) -> String {
        format!(
            "{}/authorize?client_id={}&response_type=code&redirect_uri={}&approval_prompt=force&scope={}",
            self.oauth_url,
            self.client_id,
            urlencoding::encode(redirect_uri),
            scope
        )
    }

    // ─── OAuth ───────────────────────────────────────────────────────────────

    /// Exchange an authorization code for a token bundle.
    ///
    /// Fails with `AuthExchange` carrying Strava's error payload.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AppError> {
        let request = TokenRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            code: Some(code),
            refresh_token: None,
            grant_type: "authorization_code",
        };

        let response = self
            .http
            .post(format!("{}/token", self.oauth_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AuthExchange(format!("Token exchange request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Strava token exchange failed");
            return Err(AppError::AuthExchange(body));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::AuthExchange(format!("Failed to parse token response: {}", e)))
    }

    /// Refresh an access token.
    ///
    /// Strava rotates the refresh token on every call, so the returned
    /// bundle must be persisted in full.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, AppError> {
        let request = TokenRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            code: None,
            refresh_token: Some(refresh_token),
            grant_type: "refresh_token",
        };

        let response = self
            .http
            .post(format!("{}/token", self.oauth_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Refresh(format!("Token refresh request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Strava token refresh failed");
            return Err(AppError::Refresh(body));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Refresh(format!("Failed to parse token response: {}", e)))
    }

    // ─── Activities ──────────────────────────────────────────────────────────

    /// Fetch a detailed activity using the client's retry policy.
    pub async fn fetch_activity(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<StravaActivity, AppError> {
        self.fetch_activity_with_policy(access_token, activity_id, self.retry)
            .await
    }

    /// Fetch a detailed activity, retrying while it is not yet available.
    ///
    /// Every failed attempt except the last waits `policy.delay_for(attempt)`
    /// and tries again, whatever the failure was. If the last attempt got a
    /// 404 the fetch fails with `FetchExhausted`; any other last failure is
    /// returned as `Fetch`.
    pub async fn fetch_activity_with_policy(
        &self,
        access_token: &str,
        activity_id: u64,
        policy: RetryPolicy,
    ) -> Result<StravaActivity, AppError> {
        let url = format!("{}/activities/{}", self.base_url, activity_id);
        let max_attempts = policy.max_attempts();
        let mut attempt = 0;

        loop {
            let failure = match self.try_fetch(&url, access_token).await {
                Ok(activity) => {
                    tracing::info!(
                        activity_id,
                        attempt = attempt + 1,
                        "Activity fetched"
                    );
                    return Ok(activity);
                }
                Err(failure) => failure,
            };

            if policy.is_last_attempt(attempt) {
                tracing::warn!(
                    activity_id,
                    attempts = max_attempts,
                    error = %failure.reason,
                    "Giving up on activity fetch"
                );
                return Err(if failure.not_found {
                    AppError::FetchExhausted {
                        activity_id,
                        attempts: max_attempts,
                        last_error: failure.reason,
                    }
                } else {
                    AppError::Fetch(failure.reason)
                });
            }

            let delay = policy.delay_for(attempt);
            tracing::info!(
                activity_id,
                attempt = attempt + 1,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                reason = %failure.reason,
                "Activity fetch failed, retrying"
            );
            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }

    /// Issue a single activity request.
    async fn try_fetch(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<StravaActivity, FetchFailure> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| FetchFailure::other(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<StravaActivity>()
                .await
                .map_err(|e| FetchFailure::other(format!("JSON parse error: {}", e)));
        }

        let body = response.text().await.unwrap_or_default();
        Err(FetchFailure {
            reason: format!("HTTP {}: {}", status, body),
            not_found: status == StatusCode::NOT_FOUND,
        })
    }
}

/// Why one fetch attempt did not produce an activity.
#[derive(Debug)]
struct FetchFailure {
    reason: String,
    /// Strava answered 404: the activity may not have propagated yet.
    not_found: bool,
}

impl FetchFailure {
    fn other(reason: String) -> Self {
        Self {
            reason,
            not_found: false,
        }
    }
}

/// Body of a request to the OAuth token endpoint.
#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
    grant_type: &'a str,
}

/// Token bundle returned by the OAuth token endpoint.
///
/// `expires_at` is Strava's epoch-seconds value, passed through untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Only present on authorization code exchange.
    #[serde(default)]
    pub athlete: Option<StravaAthlete>,
}

/// Athlete summary included in the token exchange response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StravaAthlete {
    pub id: u64,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
}

/// Detailed Strava activity response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StravaActivity {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Legacy activity type (Run, Ride, Hike, ...)
    #[serde(rename = "type", default)]
    pub activity_type: String,
    #[serde(default)]
    pub sport_type: Option<String>,
    /// Distance in meters
    #[serde(default)]
    pub distance: f64,
    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: u64,
    /// Elapsed time in seconds
    #[serde(default)]
    pub elapsed_time: u64,
    /// Elevation gain in meters
    #[serde(default)]
    pub total_elevation_gain: Option<f64>,
    pub start_date: String,
    #[serde(default)]
    pub start_date_local: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    /// Meters per second
    #[serde(default)]
    pub average_speed: Option<f64>,
    #[serde(default)]
    pub max_speed: Option<f64>,
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    #[serde(default)]
    pub max_heartrate: Option<f64>,
    #[serde(default)]
    pub calories: Option<f64>,
    /// Everything else Strava sent.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
