// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Notion Sync API Server
//!
//! Receives Strava webhook events and mirrors newly created activities into
//! a Notion database.

use std::sync::Arc;
use strava_notion_sync::{
    config::Config,
    db::{CredentialStore, MemoryCredentialStore, SupabaseCredentialStore},
    services::{NotionExporter, StravaClient},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Strava-Notion Sync");

    // Credential store
    let store: Arc<dyn CredentialStore> = match &config.supabase {
        Some(supabase) => {
            tracing::info!(url = %supabase.url, "Using Supabase credential store");
            Arc::new(SupabaseCredentialStore::new(supabase))
        }
        None => {
            tracing::warn!("SUPABASE_URL not set, credentials will be kept in memory only");
            Arc::new(MemoryCredentialStore::new())
        }
    };

    // Notion exporter
    let exporter = NotionExporter::from_config(&config);
    if !exporter.verify_database().await {
        tracing::warn!("Continuing without a verified Notion database");
    }

    let strava = StravaClient::from_config(&config);
    tracing::info!(
        max_attempts = config.fetch_max_attempts,
        initial_delay_ms = config.fetch_initial_delay.as_millis() as u64,
        "Strava client initialized"
    );

    // Build shared state
    let state = Arc::new(AppState::new(
        config.clone(),
        strava,
        store,
        Arc::new(exporter),
    ));

    // Build router
    let app = strava_notion_sync::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("strava_notion_sync=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
