// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat payloads and mesh-state entries.

use crate::node_id::{Group, NodeId};
use crate::version::Version;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The liveness status a node announces for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeartbeatStatus {
    Online,
    Offline,
    ShuttingDown,
}

/// Self-announce payload emitted once per heartbeat cycle and stored both
/// under the node's own key and as a field of `mesh:state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatPayload {
    pub node_id: NodeId,
    pub group: Group,
    pub symbols: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub status: HeartbeatStatus,
    pub version: Version,
}

impl HeartbeatPayload {
    pub fn mesh_field(&self) -> String {
        format!("{}:{}", self.node_id, self.group)
    }

    /// Whether `self`, observed at `now`, has drifted beyond `max_age`.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: chrono::Duration) -> bool {
        now.signed_duration_since(self.timestamp) > max_age
    }
}

/// A `mesh:state` hash entry: the last payload observed for a `(node, group)`
/// pair, plus watcher-local bookkeeping used by the mark-then-prune
/// algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshEntry {
    pub payload: HeartbeatPayload,
    /// Set by the watcher on the cycle it first observes this entry as
    /// stale; cleared if a fresh heartbeat arrives. Absent entries are
    /// pruned on the next cycle they are still marked.
    #[serde(default)]
    pub marked_offline_at: Option<DateTime<Utc>>,
}

impl MeshEntry {
    pub fn fresh(payload: HeartbeatPayload) -> Self {
        Self { payload, marked_offline_at: None }
    }

    pub fn key(&self) -> String {
        self.payload.mesh_field()
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
