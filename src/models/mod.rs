// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod credential;
pub mod event;

pub use activity::NotionActivity;
pub use credential::CredentialRecord;
pub use event::{AspectType, DispatchOutcome, InboundEvent, ObjectType, WebhookAck};
