// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava webhook event payloads and the acknowledgment sent back.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of object a webhook event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Activity,
    Athlete,
    #[serde(other)]
    Unknown,
}

/// What happened to the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectType {
    Create,
    Update,
    Delete,
    #[serde(other)]
    Unknown,
}

/// Strava webhook event payload.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEvent {
    pub aspect_type: AspectType,
    pub object_type: ObjectType,
    /// Activity ID or athlete ID, depending on `object_type`
    pub object_id: u64,
    /// Athlete who owns the object
    pub owner_id: u64,
    #[serde(default)]
    pub subscription_id: Option<u64>,
    /// Unix timestamp of the event
    #[serde(default)]
    pub event_time: Option<i64>,
    /// Changed fields for update events, e.g. {"title": "Morning Ride"}
    #[serde(default)]
    pub updates: Option<HashMap<String, serde_json::Value>>,
}

/// Result of dispatching a single webhook event.
///
/// Always produced, whatever happened while processing the event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub processed: bool,
    pub skipped: bool,
    /// Name of the fetched activity
    #[serde(rename = "activity", skip_serializing_if = "Option::is_none")]
    pub resource_summary: Option<String>,
    /// Notion page created for the activity
    #[serde(rename = "page_id", skip_serializing_if = "Option::is_none")]
    pub downstream_id: Option<String>,
    /// Set when the activity was fetched but could not be exported
    #[serde(rename = "export_error", skip_serializing_if = "Option::is_none")]
    pub downstream_error: Option<String>,
    /// Set when the event could not be processed at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchOutcome {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// JSON body returned for every webhook delivery.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
}

impl From<DispatchOutcome> for WebhookAck {
    fn from(outcome: DispatchOutcome) -> Self {
        Self {
            received: true,
            outcome,
        }
    }
}
