// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The mesh registry: a read-only view over the `mesh:state` hash. Not an
//! independent running component — the heartbeat watcher owns every write
//! to it — but callers that only need to observe current membership (a
//! future SSE consumer, or a test asserting on the mesh after a scan)
//! shouldn't have to know the watcher's internals to do so.

use std::collections::HashMap;
use std::sync::Arc;

use chainfeed_bus::Bus;
use chainfeed_core::{keys, MeshEntry};

/// Thin read accessor over `mesh:state`.
pub struct MeshRegistry<B: Bus> {
    bus: Arc<B>,
}

impl<B: Bus> MeshRegistry<B> {
    pub fn new(bus: Arc<B>) -> Self {
        Self { bus }
    }

    /// Every entry currently in the registry, keyed by `{node_id}:{group}`.
    /// Malformed entries are skipped rather than failing the whole read.
    pub async fn snapshot(&self) -> Result<HashMap<String, MeshEntry>, chainfeed_bus::BusError> {
        let raw = self.bus.hgetall(keys::MESH_STATE).await?;
        Ok(raw
            .into_iter()
            .filter_map(|(field, json)| serde_json::from_str::<MeshEntry>(&json).ok().map(|e| (field, e)))
            .collect())
    }

    /// Entry for a specific `(node_id, group)` pair, if present.
    pub async fn get(&self, node_id: &str, group: &str) -> Result<Option<MeshEntry>, chainfeed_bus::BusError> {
        let field = format!("{node_id}:{group}");
        Ok(self.snapshot().await?.remove(&field))
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
