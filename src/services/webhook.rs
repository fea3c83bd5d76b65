// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook event dispatch.
//!
//! Strava retries any delivery that does not get a 2xx, so every event is
//! acknowledged exactly once: failures become a `DispatchOutcome` carrying a
//! sanitized message and the details go to the log.

use crate::error::AppError;
use crate::models::{AspectType, DispatchOutcome, InboundEvent, ObjectType};
use crate::services::activity::ActivityService;
use crate::services::notion::ActivityExporter;
use std::sync::Arc;

/// What to do with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    /// Fetch the new activity and export it.
    ExportNewActivity,
    /// Activity edits are not re-fetched.
    SkipActivityUpdate,
    /// Everything else (deletes, athlete events, unknown kinds).
    Unhandled,
}

/// Classify an event by its object and aspect type.
pub fn classify(object_type: ObjectType, aspect_type: AspectType) -> EventAction {
    match (object_type, aspect_type) {
        (ObjectType::Activity, AspectType::Create) => EventAction::ExportNewActivity,
        (ObjectType::Activity, AspectType::Update) => EventAction::SkipActivityUpdate,
        _ => EventAction::Unhandled,
    }
}

/// Collapse the result of processing an event into the outcome reported to
/// the caller. Errors are logged in full and reported by category only.
pub fn collapse(result: Result<DispatchOutcome, AppError>) -> DispatchOutcome {
    match result {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "Webhook event processing failed");
            DispatchOutcome::failed(e.public_message())
        }
    }
}

/// Routes webhook events to their handling path.
#[derive(Clone)]
pub struct WebhookDispatcher {
    activities: ActivityService,
    exporter: Arc<dyn ActivityExporter>,
}

impl WebhookDispatcher {
    pub fn new(activities: ActivityService, exporter: Arc<dyn ActivityExporter>) -> Self {
        Self {
            activities,
            exporter,
        }
    }

    /// Handle one event. Never fails.
    pub async fn dispatch(&self, event: &InboundEvent) -> DispatchOutcome {
        tracing::info!(
            object_type = ?event.object_type,
            aspect_type = ?event.aspect_type,
            object_id = event.object_id,
            owner_id = event.owner_id,
            "Dispatching webhook event"
        );

        match classify(event.object_type, event.aspect_type) {
            EventAction::ExportNewActivity => collapse(self.export_new_activity(event).await),
            EventAction::SkipActivityUpdate => {
                tracing::info!(
                    activity_id = event.object_id,
                    updates = ?event.updates,
                    "Activity updated, skipping"
                );
                DispatchOutcome::skipped()
            }
            EventAction::Unhandled => {
                tracing::debug!(
                    object_type = ?event.object_type,
                    aspect_type = ?event.aspect_type,
                    "Ignoring unhandled event type"
                );
                DispatchOutcome::skipped()
            }
        }
    }

    /// Fetch the activity and hand it to the exporter.
    ///
    /// Export failures are folded into the outcome here so they stay
    /// distinguishable from fetch failures.
    async fn export_new_activity(&self, event: &InboundEvent) -> Result<DispatchOutcome, AppError> {
        let activity = self
            .activities
            .fetch_for_athlete(event.object_id, event.owner_id)
            .await?;

        let outcome = match self.exporter.save(&activity).await {
            Ok(page_id) => DispatchOutcome {
                processed: true,
                resource_summary: Some(activity.name),
                downstream_id: Some(page_id),
                ..DispatchOutcome::default()
            },
            Err(e) => {
                tracing::error!(
                    activity_id = activity.id,
                    error = %e,
                    "Activity fetched but export failed"
                );
                DispatchOutcome {
                    processed: true,
                    resource_summary: Some(activity.name),
                    downstream_error: Some(e.public_message().to_string()),
                    ..DispatchOutcome::default()
                }
            }
        };

        Ok(outcome)
    }
}
