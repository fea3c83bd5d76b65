//! Stored OAuth credentials for a connected athlete.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Credential record persisted in the credential store.
///
/// Keyed by `athlete_id`; at most one record exists per athlete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Strava athlete ID (unique key)
    pub athlete_id: u64,
    /// Current access token
    pub access_token: String,
    /// Refresh token (rotates on every refresh)
    pub refresh_token: String,
    /// When the access token expires
    pub expires_at: DateTime<Utc>,
    /// Scope granted at authorization time
    pub scope: String,
}

impl CredentialRecord {
    /// Time left before the access token expires (negative once expired).
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.expires_at - now
    }
}
