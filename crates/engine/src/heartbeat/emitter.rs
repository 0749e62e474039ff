// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic self-announce: every `heartbeat_interval_sec`, for each group
//! the node participates in, write a heartbeat atomically to the node's
//! own key, the mesh hash, and the mesh update channel.

use std::sync::Arc;

use chainfeed_bus::{Bus, Pipeline, Ttl};
use chainfeed_core::{keys, Clock, Group, HeartbeatPayload, HeartbeatStatus, NodeId};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::truth::TruthService;

/// Groups the node participates in, derived from the truth snapshot.
/// `chainfeed.feed_scope`'s keys name the configured groups; a node with
/// none configured still announces under the implicit `default` group so
/// a lone node is observable in the mesh.
fn configured_groups(truth: &chainfeed_core::Truth) -> Vec<Group> {
    if truth.chainfeed.feed_scope.is_empty() {
        vec![Group::new("default")]
    } else {
        truth.chainfeed.feed_scope.keys().map(|g| Group::new(g.clone())).collect()
    }
}

pub struct HeartbeatEmitter<B: Bus, C: Clock> {
    node_id: NodeId,
    truth: TruthService,
    bus: Arc<B>,
    clock: C,
}

impl<B: Bus, C: Clock> HeartbeatEmitter<B, C> {
    pub fn new(node_id: NodeId, truth: TruthService, bus: Arc<B>, clock: C) -> Self {
        Self { node_id, truth, bus, clock }
    }

    /// Spawn the emitter loop. Cancellation causes one final
    /// `status=shutting_down` payload to be emitted before the task exits.
    pub fn spawn(self, cancel: CancellationToken) -> tokio::task::JoinHandle<()>
    where
        B: 'static,
        C: 'static,
    {
        tokio::spawn(async move {
            loop {
                let snapshot = self.truth.get();
                let interval = std::time::Duration::from_secs(snapshot.mesh.heartbeat_interval_sec.max(1));

                tokio::select! {
                    _ = cancel.cancelled() => {
                        self.emit_shutdown(&snapshot).await;
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {
                        self.emit_cycle(&snapshot).await;
                    }
                }
            }
        })
    }

    async fn emit_cycle(&self, truth: &chainfeed_core::Truth) {
        let now = self.clock.now_utc();
        let groups = configured_groups(truth);
        let mut pipeline = Pipeline::new();

        for group in &groups {
            let payload = HeartbeatPayload {
                node_id: self.node_id.clone(),
                group: group.clone(),
                symbols: truth.chainfeed.default_symbols.clone(),
                timestamp: now,
                status: HeartbeatStatus::Online,
                version: truth.version.clone(),
            };
            let Ok(json) = serde_json::to_string(&payload) else { continue };
            pipeline = pipeline
                .set(keys::heartbeat_by_group(group), json.clone(), Some(Ttl::seconds(truth.mesh.max_heartbeat_age_sec)))
                .hset(keys::MESH_STATE, payload.mesh_field(), json.clone())
                .publish(keys::CHANNEL_MESH_UPDATE, json);
        }

        if pipeline.is_empty() {
            return;
        }
        if let Err(err) = self.bus.pipeline(pipeline).await {
            warn!(error = %err, node_id = %self.node_id, "heartbeat emission failed, will retry next cycle");
        }
    }

    async fn emit_shutdown(&self, truth: &chainfeed_core::Truth) {
        let now = self.clock.now_utc();
        let groups = configured_groups(truth);
        let mut pipeline = Pipeline::new();

        for group in &groups {
            let payload = HeartbeatPayload {
                node_id: self.node_id.clone(),
                group: group.clone(),
                symbols: truth.chainfeed.default_symbols.clone(),
                timestamp: now,
                status: HeartbeatStatus::ShuttingDown,
                version: truth.version.clone(),
            };
            let Ok(json) = serde_json::to_string(&payload) else { continue };
            pipeline = pipeline
                .set(keys::heartbeat_by_group(group), json.clone(), Some(Ttl::seconds(truth.mesh.max_heartbeat_age_sec)))
                .hset(keys::MESH_STATE, payload.mesh_field(), json.clone())
                .publish(keys::CHANNEL_MESH_UPDATE, json);
        }
        pipeline = pipeline.set(keys::SHUTDOWN_NOTICE, format!("{{\"node_id\":\"{}\"}}", self.node_id), None);

        if let Err(err) = self.bus.pipeline(pipeline).await {
            warn!(error = %err, node_id = %self.node_id, "final shutdown heartbeat failed");
        } else {
            info!(node_id = %self.node_id, "emitted shutting_down heartbeat");
        }
    }
}

#[cfg(test)]
#[path = "emitter_tests.rs"]
mod tests;
