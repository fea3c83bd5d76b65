// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exponential backoff schedule for Strava activity fetches.
//!
//! A freshly created activity is not always readable the moment its webhook
//! fires, so fetches are retried on a doubling delay: 2s, 4s, 8s, 16s with the
//! default policy (about 30s of waiting across five attempts).

use async_trait::async_trait;
use std::time::Duration;

/// Bounded retry policy for activity fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of requests, including the first one. Never zero.
    max_attempts: u32,
    /// Wait before the second attempt; doubles for each one after.
    initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Delay to wait after the failed attempt `attempt` (0-indexed):
    /// `initial_delay * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Whether `attempt` (0-indexed) is the last one allowed.
    pub fn is_last_attempt(&self, attempt: u32) -> bool {
        attempt + 1 >= self.max_attempts
    }
}

/// Suspends the current task between retries.
///
/// Production code sleeps on the tokio timer; tests substitute an
/// implementation that records the requested delays instead.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
