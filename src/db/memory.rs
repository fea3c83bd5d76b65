// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process credential store for local development and tests.

use crate::db::CredentialStore;
use crate::error::AppError;
use crate::models::CredentialRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

/// Credential store backed by a concurrent hash map.
///
/// Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    records: Arc<DashMap<u64, CredentialRecord>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, athlete_id: u64) -> Result<Option<CredentialRecord>, AppError> {
        Ok(self.records.get(&athlete_id).map(|r| r.value().clone()))
    }

    async fn upsert(&self, record: &CredentialRecord) -> Result<CredentialRecord, AppError> {
        self.records.insert(record.athlete_id, record.clone());
        Ok(record.clone())
    }

    async fn update_tokens(
        &self,
        athlete_id: u64,
        access_token: &str,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut record = self
            .records
            .get_mut(&athlete_id)
            .ok_or_else(|| AppError::NotFound(format!("Credentials for athlete {}", athlete_id)))?;

        record.access_token = access_token.to_string();
        record.refresh_token = refresh_token.to_string();
        record.expires_at = expires_at;
        Ok(())
    }
}
