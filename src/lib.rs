// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava-Notion Sync: mirror new Strava activities into a Notion database
//!
//! This crate receives Strava webhook events, fetches the new activity on
//! behalf of the athlete (refreshing OAuth tokens as needed) and writes it
//! to Notion.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::CredentialStore;
use services::{
    ActivityExporter, ActivityService, AuthService, StravaClient, TokenService, WebhookDispatcher,
};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub auth_service: AuthService,
    pub dispatcher: WebhookDispatcher,
}

impl AppState {
    /// Wire the services together around a credential store and exporter.
    pub fn new(
        config: Config,
        strava: StravaClient,
        store: Arc<dyn CredentialStore>,
        exporter: Arc<dyn ActivityExporter>,
    ) -> Self {
        let tokens = TokenService::new(strava.clone(), store.clone());
        let activities = ActivityService::new(strava.clone(), tokens);
        let auth_service = AuthService::new(strava, store, config.redirect_uri.clone());
        let dispatcher = WebhookDispatcher::new(activities, exporter);

        Self {
            config,
            auth_service,
            dispatcher,
        }
    }
}
