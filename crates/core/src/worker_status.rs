// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-(symbol | rss-group) worker health records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Active,
    Invalid,
    Degraded,
    Stopped,
}

/// The status record a worker writes after each cycle, e.g. under
/// `truth:feed:{sym}:validation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerStatus {
    pub state: WorkerState,
    pub item_count: usize,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl WorkerStatus {
    pub fn active(item_count: usize, timestamp: DateTime<Utc>) -> Self {
        Self { state: WorkerState::Active, item_count, timestamp, reason: None }
    }

    pub fn degraded(item_count: usize, timestamp: DateTime<Utc>, reason: impl Into<String>) -> Self {
        Self { state: WorkerState::Degraded, item_count, timestamp, reason: Some(reason.into()) }
    }

    pub fn invalid(timestamp: DateTime<Utc>, reason: impl Into<String>) -> Self {
        Self { state: WorkerState::Invalid, item_count: 0, timestamp, reason: Some(reason.into()) }
    }

    pub fn stopped(timestamp: DateTime<Utc>) -> Self {
        Self { state: WorkerState::Stopped, item_count: 0, timestamp, reason: None }
    }
}

/// Tracks consecutive failures for the "three strikes → degraded" rule.
/// Local to a single worker's loop — never shared.
#[derive(Debug, Default)]
pub struct ConsecutiveFailures {
    count: u32,
}

impl ConsecutiveFailures {
    const DEGRADED_THRESHOLD: u32 = 3;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_failure(&mut self) -> bool {
        self.count += 1;
        self.count >= Self::DEGRADED_THRESHOLD
    }

    /// Resets the streak. Returns `true` if this success follows a run that
    /// had already crossed [`Self::DEGRADED_THRESHOLD`] — i.e. the caller
    /// just recovered from a published `degraded` status and should
    /// re-publish `active`.
    pub fn record_success(&mut self) -> bool {
        let was_degraded = self.count >= Self::DEGRADED_THRESHOLD;
        self.count = 0;
        was_degraded
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
#[path = "worker_status_tests.rs"]
mod tests;
