// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity retrieval on behalf of an athlete.
//!
//! Handles the fetch half of the webhook workflow:
//! 1. Resolve a valid access token (refreshing if needed)
//! 2. Fetch the activity from Strava, retrying while it propagates

use crate::error::Result;
use crate::services::strava::{StravaActivity, StravaClient};
use crate::services::token::TokenService;

/// Fetches activities for connected athletes.
#[derive(Clone)]
pub struct ActivityService {
    strava: StravaClient,
    tokens: TokenService,
}

impl ActivityService {
    pub fn new(strava: StravaClient, tokens: TokenService) -> Self {
        Self { strava, tokens }
    }

    /// Fetch an activity for an athlete, handling token refresh.
    pub async fn fetch_for_athlete(
        &self,
        activity_id: u64,
        athlete_id: u64,
    ) -> Result<StravaActivity> {
        let access_token = self.tokens.get_valid_access_token(athlete_id).await?;
        tracing::debug!(athlete_id, "Access token obtained");

        let activity = self.strava.fetch_activity(&access_token, activity_id).await?;

        tracing::info!(
            athlete_id,
            activity_id,
            name = %activity.name,
            activity_type = %activity.activity_type,
            distance = activity.distance,
            "Activity fetched"
        );

        Ok(activity)
    }
}
