// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The startup orchestrator (C7): ordered, gated bring-up of C1 through
//! C6, publishing `truth:system:startup_status` after every phase.
//! Grounded on the teacher's own `startup`/`startup_inner` split — a thin
//! outer function exists in spirit here too, except this node has nothing
//! to roll back on failure (no socket, lock file, or WAL to clean up; the
//! bus is the only durable resource, and it's the one thing a failed
//! startup never got to write to in the first place).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chainfeed_bus::Bus;
use chainfeed_core::{keys, Clock, NodeId, Truth};
use chainfeed_engine::{load_seed, FeedOrchestrator, HeartbeatEmitter, HeartbeatWatcher, TruthError, TruthService};
use chainfeed_providers::{ChainProvider, HttpChainProvider, ProviderTable, RssSource};
use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{ComponentStatus, Config, LifecycleError, PhaseStatusMap, StartedNode};

#[derive(Debug, Clone, serde::Serialize)]
struct StartupStatusPayload {
    phase: String,
    status: IndexMap<String, ComponentStatus>,
    overall: ComponentStatus,
    timestamp: chrono::DateTime<chrono::Utc>,
}

async fn publish_status(bus: &Arc<dyn Bus>, phase: &str, phases: &PhaseStatusMap) -> Result<(), LifecycleError> {
    let overall = if phases.all_healthy() { ComponentStatus::Ok } else { ComponentStatus::Error };
    let payload =
        StartupStatusPayload { phase: phase.to_string(), status: phases.snapshot(), overall, timestamp: chrono::Utc::now() };
    let json = serde_json::to_string(&payload)?;
    bus.set(keys::STARTUP_STATUS, json, None).await?;
    info!(phase, ?overall, "published startup status");
    Ok(())
}

/// Load the local seed document; if none exists, fall back to whatever is
/// already on the bus. Fatal only when neither is available (spec.md §7).
async fn resolve_initial_truth(bus: &Arc<dyn Bus>, path_override: Option<&Path>) -> Result<Truth, LifecycleError> {
    match load_seed(path_override) {
        Ok(truth) => Ok(truth),
        Err(TruthError::SeedNotFound) => match bus.get(keys::TRUTH_SCHEMA).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| LifecycleError::MalformedSeed(e.to_string())),
            None => Err(LifecycleError::NoTruthAvailable),
        },
        Err(other) => Err(LifecycleError::MalformedSeed(other.to_string())),
    }
}

/// One `HttpChainProvider` per enabled `providers.data_providers.<name>`
/// entry, falling back to the `POLYGON_*` environment variables only when
/// the truth document itself leaves a field empty.
fn build_provider_table(truth: &Truth) -> ProviderTable {
    let mut table: ProviderTable = HashMap::new();
    for (name, cfg) in &truth.providers.data_providers {
        if !cfg.enabled {
            continue;
        }
        let api_key = cfg.resolve_api_key().or_else(crate::env::polygon_api_key);
        let base_url = if cfg.base_url.is_empty() { crate::env::polygon_base_url() } else { cfg.base_url.clone() };
        let provider: Arc<dyn ChainProvider> = Arc::new(HttpChainProvider::new(name.clone(), base_url, api_key));
        table.insert(name.clone(), provider);
    }
    table
}

/// Run every phase in `PHASES` order and return a handle to the running
/// node, or the first fatal error. `core_services_started` is the only
/// phase whose failure aborts startup outright (spec.md §4.7); every later
/// phase's component failures are recorded in the phase map and startup
/// continues, matching "a component in error causes the phase transition
/// to be attempted anyway".
pub async fn startup<B, C, R>(bus: Arc<B>, clock: C, rss_source: Arc<R>, config: Config) -> Result<StartedNode, LifecycleError>
where
    B: Bus + 'static,
    C: Clock + 'static,
    R: RssSource + 'static,
{
    let phases = Arc::new(PhaseStatusMap::new());
    let bus_dyn: Arc<dyn Bus> = bus.clone();

    // Phase 1: redis_connected. `bus` is already a live connection by the
    // time it reaches this function — a connection failure is fatal
    // before there's anything to publish to (spec.md §7).
    phases.set("bus", ComponentStatus::Ok);
    publish_status(&bus_dyn, "redis_connected", &phases).await?;

    // Phase 2: core_services_started — C2 (Truth Service) and C3
    // (heartbeat emitter + watcher).
    let initial_truth = resolve_initial_truth(&bus_dyn, config.seed_path_override.as_deref()).await?;
    let truth = TruthService::new(initial_truth, bus_dyn.clone());
    if let Err(err) = truth.sync_with_bus().await {
        warn!(error = %err, "truth sync with bus failed, continuing with local seed");
    }
    phases.set("truth", ComponentStatus::Ok);

    let truth_listener_cancel = CancellationToken::new();
    let truth_listener = truth.subscribe(truth_listener_cancel.clone());

    let snapshot = truth.get();
    let node_id = NodeId::resolve(&snapshot);

    let heartbeat_emitter_cancel = CancellationToken::new();
    let emitter = HeartbeatEmitter::new(node_id.clone(), truth.clone(), bus.clone(), clock.clone());
    let heartbeat_emitter_join = emitter.spawn(heartbeat_emitter_cancel.clone());
    phases.set("heartbeat_emitter", ComponentStatus::Active);

    let heartbeat_watcher_cancel = CancellationToken::new();
    let watcher = HeartbeatWatcher::new(
        node_id.clone(),
        bus.clone(),
        clock.clone(),
        snapshot.mesh.heartbeat_interval_sec,
        snapshot.mesh.max_heartbeat_age_sec,
    );
    let heartbeat_watcher_join = watcher.spawn(heartbeat_watcher_cancel.clone());
    phases.set("heartbeat_watcher", ComponentStatus::Active);

    if !phases.all_healthy() {
        publish_status(&bus_dyn, "core_services_started", &phases).await?;
        return Err(LifecycleError::NoTruthAvailable);
    }
    publish_status(&bus_dyn, "core_services_started", &phases).await?;

    // Phases 3-6: the Feed Orchestrator (C5) launches every C6 worker
    // (raw chain, diff transform, synthetic spot, RSS) as one unit per
    // spec.md §4.5's five-step sequence. The phases below are reported as
    // sequential publications over that one launch rather than four
    // independent launch calls — see DESIGN.md.
    let providers = build_provider_table(&snapshot);
    let orchestrator = FeedOrchestrator::start(snapshot.clone(), bus.clone(), providers, rss_source, clock.clone()).await;
    let worker_names: Vec<String> = orchestrator.worker_names().into_iter().map(str::to_string).collect();

    let feed_status = if snapshot.chainfeed.default_symbols.is_empty() || worker_names.iter().any(|n| n.starts_with("raw_chain:")) {
        ComponentStatus::Ok
    } else {
        ComponentStatus::Stub
    };
    phases.set("feed_service", feed_status);
    publish_status(&bus_dyn, "feed_service_initialized", &phases).await?;

    let diff_status = if worker_names.iter().any(|n| n == "diff_transform") { ComponentStatus::Active } else { ComponentStatus::Stub };
    phases.set("diff_transform", diff_status);
    publish_status(&bus_dyn, "diff_transform_active", &phases).await?;

    let rss_status = if worker_names.iter().any(|n| n.starts_with("rss:")) { ComponentStatus::Active } else { ComponentStatus::Stub };
    phases.set("rss_feeds", rss_status);
    publish_status(&bus_dyn, "rss_feeds_initialized", &phases).await?;

    let synthetic_status = if worker_names.iter().any(|n| n.starts_with("synthetic:")) { ComponentStatus::Active } else { ComponentStatus::Stub };
    phases.set("synthetic_spot", synthetic_status);
    publish_status(&bus_dyn, "synthetic_spot_initialized", &phases).await?;

    // Phase 7: entity_bridge_initialized — optional identity records.
    for entity in &snapshot.entities {
        let record = serde_json::json!({
            "id": entity.id,
            "role": entity.role,
            "symbols": entity.symbols,
        });
        if let Ok(json) = serde_json::to_string(&record) {
            if let Err(err) = bus_dyn.set(&keys::entity_record(&entity.id), json, None).await {
                warn!(entity = %entity.id, error = %err, "failed to publish entity record");
            }
        }
    }
    phases.set("entity_bridge", if snapshot.entities.is_empty() { ComponentStatus::Stub } else { ComponentStatus::Ok });
    publish_status(&bus_dyn, "entity_bridge_initialized", &phases).await?;

    // Phase 8: runtime_started — control passes to the supervision loop.
    phases.set("runtime", ComponentStatus::Active);
    publish_status(&bus_dyn, "runtime_started", &phases).await?;

    // Phase 9: startup_complete.
    publish_status(&bus_dyn, "startup_complete", &phases).await?;
    info!(node_id = %node_id, workers = worker_names.len(), "node startup complete");

    Ok(StartedNode {
        node_id,
        bus: bus_dyn,
        truth,
        truth_listener_cancel,
        truth_listener,
        heartbeat_emitter_cancel,
        heartbeat_emitter_join,
        heartbeat_watcher_cancel,
        heartbeat_watcher_join,
        orchestrator,
        phases,
    })
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
