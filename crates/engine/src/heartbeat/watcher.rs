// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Peer liveness scanning: every `heartbeat_interval_sec / 3`, list every
//! live `heartbeat:*` key, compute drift against each payload's
//! timestamp, and reconcile `mesh:state` — marking stale entries offline
//! for one cycle before pruning them, and never touching this node's own
//! entries.

use std::collections::HashSet;
use std::sync::Arc;

use chainfeed_bus::{Bus, Pipeline};
use chainfeed_core::{keys, Clock, HeartbeatPayload, HeartbeatStatus, MeshEntry, NodeId};
use tokio_util::sync::CancellationToken;
use tracing::warn;

pub struct HeartbeatWatcher<B: Bus, C: Clock> {
    self_node_id: NodeId,
    bus: Arc<B>,
    clock: C,
    heartbeat_interval_sec: u64,
    max_heartbeat_age_sec: u64,
}

impl<B: Bus, C: Clock> HeartbeatWatcher<B, C> {
    pub fn new(self_node_id: NodeId, bus: Arc<B>, clock: C, heartbeat_interval_sec: u64, max_heartbeat_age_sec: u64) -> Self {
        Self { self_node_id, bus, clock, heartbeat_interval_sec, max_heartbeat_age_sec }
    }

    pub fn spawn(self, cancel: CancellationToken) -> tokio::task::JoinHandle<()>
    where
        B: 'static,
        C: 'static,
    {
        tokio::spawn(async move {
            let cadence = std::time::Duration::from_secs((self.heartbeat_interval_sec.max(1) / 3).max(1));
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(cadence) => {
                        self.scan_and_reconcile().await;
                    }
                }
            }
        })
    }

    async fn scan_and_reconcile(&self) {
        let live_keys = match self.bus.keys("heartbeat:*").await {
            Ok(keys) => keys,
            Err(err) => {
                warn!(error = %err, "failed to list heartbeat keys");
                return;
            }
        };

        let now = self.clock.now_utc();
        let max_age = chrono::Duration::seconds(self.max_heartbeat_age_sec as i64);
        let mut observed_fields = HashSet::new();

        for key in live_keys {
            let Ok(Some(raw)) = self.bus.get(&key).await else { continue };
            let payload: HeartbeatPayload = match serde_json::from_str(&raw) {
                Ok(p) => p,
                Err(err) => {
                    warn!(error = %err, key = %key, "malformed heartbeat payload, skipping");
                    continue;
                }
            };
            observed_fields.insert(payload.mesh_field());
            if !payload.is_stale(now, max_age) {
                self.write_fresh(&payload).await;
            }
        }

        self.prune_stale(&observed_fields, now).await;
    }

    async fn write_fresh(&self, payload: &HeartbeatPayload) {
        let entry = MeshEntry::fresh(payload.clone());
        let Ok(json) = serde_json::to_string(&entry) else { return };
        if let Err(err) = self.bus.hset(keys::MESH_STATE, entry.key(), json).await {
            warn!(error = %err, field = %entry.key(), "failed to refresh mesh entry");
        }
    }

    /// Entries in the registry not observed this cycle: mark offline the
    /// first time they're missed, prune on the next cycle they're still
    /// missing. This node's own entries are never pruned by the watcher.
    async fn prune_stale(&self, observed: &HashSet<String>, now: chrono::DateTime<chrono::Utc>) {
        let registry = match self.bus.hgetall(keys::MESH_STATE).await {
            Ok(map) => map,
            Err(err) => {
                warn!(error = %err, "failed to read mesh registry for reconciliation");
                return;
            }
        };

        let mut pipeline = Pipeline::new();
        let mut alerts = Vec::new();

        for (field, raw) in registry {
            if observed.contains(&field) {
                continue;
            }
            if field.starts_with(&format!("{}:", self.self_node_id)) {
                continue;
            }
            let Ok(mut entry) = serde_json::from_str::<MeshEntry>(&raw) else {
                continue;
            };
            match entry.marked_offline_at {
                Some(_) => {
                    pipeline = pipeline.hdel(keys::MESH_STATE, field.clone());
                    alerts.push(format!("mesh entry pruned: {field}"));
                }
                None => {
                    entry.payload.status = HeartbeatStatus::Offline;
                    entry.marked_offline_at = Some(now);
                    if let Ok(json) = serde_json::to_string(&entry) {
                        pipeline = pipeline.hset(keys::MESH_STATE, field.clone(), json);
                        alerts.push(format!("mesh entry marked offline: {field}"));
                    }
                }
            }
        }

        if pipeline.is_empty() {
            return;
        }
        for alert in &alerts {
            pipeline = pipeline.publish(keys::CHANNEL_SYSTEM_ALERT, alert.clone());
        }
        if let Err(err) = self.bus.pipeline(pipeline).await {
            warn!(error = %err, "failed to reconcile mesh registry");
        }
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
