// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: ordered, gated startup (C7) and graceful
//! shutdown of one ChainFeed node.

pub mod shutdown;
pub mod startup;

pub use shutdown::shutdown;
pub use startup::startup;

use std::path::PathBuf;
use std::sync::Arc;

use chainfeed_bus::Bus;
use chainfeed_core::NodeId;
use chainfeed_engine::{OrchestratorHandle, TruthService};
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Static startup configuration, resolved once from the environment and an
/// optional CLI path override before any component starts.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// First candidate in `TruthService::load_seed`'s search order, as
    /// spec.md §4.2 describes ("a file path argument").
    pub seed_path_override: Option<PathBuf>,
}

/// Per-component status recorded in the startup phase map and reflected in
/// each `truth:system:startup_status` publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Ok,
    Stub,
    Active,
    Error,
}

impl ComponentStatus {
    /// Whether this status satisfies the phase-gating rule in spec.md §4.7:
    /// "each phase must see all prior phases' components reporting status
    /// ∈ {ok, stub, active}".
    fn gates_next_phase(self) -> bool {
        !matches!(self, ComponentStatus::Error)
    }
}

/// The phase-status map the startup orchestrator mutates after every
/// component comes up, guarded by the one additional in-process lock
/// spec.md §5 allows beyond the Truth Service's own write path.
#[derive(Default)]
pub struct PhaseStatusMap {
    inner: Mutex<IndexMap<String, ComponentStatus>>,
}

impl PhaseStatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, component: impl Into<String>, status: ComponentStatus) {
        self.inner.lock().insert(component.into(), status);
    }

    /// Whether every recorded component so far gates the next phase —
    /// i.e. none are `Error`.
    pub fn all_healthy(&self) -> bool {
        self.inner.lock().values().all(|s| s.gates_next_phase())
    }

    pub fn snapshot(&self) -> IndexMap<String, ComponentStatus> {
        self.inner.lock().clone()
    }
}

/// Everything the shutdown handler needs to tear a node down in the order
/// spec.md §4.7 specifies.
pub struct StartedNode {
    pub node_id: NodeId,
    pub bus: Arc<dyn Bus>,
    pub truth: TruthService,
    pub truth_listener_cancel: CancellationToken,
    pub truth_listener: tokio::task::JoinHandle<()>,
    pub heartbeat_emitter_cancel: CancellationToken,
    pub heartbeat_emitter_join: tokio::task::JoinHandle<()>,
    pub heartbeat_watcher_cancel: CancellationToken,
    pub heartbeat_watcher_join: tokio::task::JoinHandle<()>,
    pub orchestrator: OrchestratorHandle,
    pub phases: Arc<PhaseStatusMap>,
}

/// Errors that can abort startup. Per spec.md §7's Fatal taxonomy, only
/// the seed-document and bus-connectivity cases are fatal; everything else
/// is a component reporting `Error` in the phase map while startup
/// continues.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("no local seed truth document found and the bus has none either")]
    NoTruthAvailable,

    #[error("seed truth document is not valid JSON: {0}")]
    MalformedSeed(String),

    #[error("bus error during startup: {0}")]
    Bus(#[from] chainfeed_bus::BusError),

    #[error("failed to serialize startup status: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
