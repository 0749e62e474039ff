// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chainfeed-engine: the node's running components — the Truth Service
//! (C2), the heartbeat emitter/watcher pair (C3), the mesh registry (C4),
//! the feed orchestrator (C5), and the ingestion workers it supervises
//! (C6). Everything here is driven by the startup orchestrator in
//! `chainfeed-daemon` (C7); nothing in this crate talks to a socket, a
//! signal, or the process environment directly.

pub mod expiration;
pub mod heartbeat;
pub mod mesh;
pub mod orchestrator;
pub mod truth;
pub mod workers;

pub use expiration::{distinct_expiries, is_valid_expiration, summarize, summarize_now, ExpirationSummary, DEFAULT_MAX_DTE};
pub use heartbeat::{HeartbeatEmitter, HeartbeatWatcher};
pub use mesh::MeshRegistry;
pub use orchestrator::{worker_states, FeedOrchestrator, FeedRegistry, OrchestratorHandle, SupervisionState};
pub use truth::{is_strictly_newer, load_seed, TruthError, TruthService};
pub use workers::{
    entry_uid, validate_market_state, validate_market_state_now, ColdStartPolicy, DiffWorker,
    DiffWorkerConfig, MarketValidation, RawChainWorker, RssMetrics, RssMetricsStatus, RssSourceSpec,
    RssWorker, RssWorkerConfig, SpotValidation, SyntheticSpotWorker,
};
