// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod auth;
pub mod notion;
pub mod retry;
pub mod strava;
pub mod token;
pub mod webhook;

pub use activity::ActivityService;
pub use auth::AuthService;
pub use notion::{ActivityExporter, NotionExporter};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
pub use strava::{StravaActivity, StravaClient, TokenResponse};
pub use token::TokenService;
pub use webhook::WebhookDispatcher;
