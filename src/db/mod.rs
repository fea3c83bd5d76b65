//! Credential storage.
//!
//! The store is the only state shared between concurrent webhook events.

pub mod memory;
pub mod supabase;

pub use memory::MemoryCredentialStore;
pub use supabase::SupabaseCredentialStore;

use crate::error::AppError;
use crate::models::CredentialRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Table names as constants.
pub mod tables {
    pub const ATHLETES: &str = "athletes";
}

/// Durable mapping from athlete ID to OAuth credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up the credentials for an athlete.
    async fn get(&self, athlete_id: u64) -> Result<Option<CredentialRecord>, AppError>;

    /// Insert or replace the record keyed by `record.athlete_id`.
    async fn upsert(&self, record: &CredentialRecord) -> Result<CredentialRecord, AppError>;

    /// Overwrite the token fields of an existing record, leaving scope untouched.
    async fn update_tokens(
        &self,
        athlete_id: u64,
        access_token: &str,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;
}
