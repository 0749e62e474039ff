// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diff Transform Worker: every `diff_interval_sec`, for each configured
//! symbol, reads `truth:chain:full:{SYM}` and its `:prev` companion,
//! computes the added/removed/changed frame, writes it under
//! `truth:chain:diff:{SYM}`, then rotates `full` into `:prev` for the next
//! cycle. Skips a symbol entirely when either frame is missing — cold-start
//! behavior is controlled by [`ColdStartPolicy`].

use std::sync::Arc;

use chainfeed_bus::{Bus, Ttl};
use chainfeed_core::{keys, ChainFeed, DiffFrame};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::expiration;

/// What to do when `:prev` is missing for a symbol. The spec's stated
/// default is to skip; `EmitAddedAll` is an escape hatch for consumers
/// that want an initial "added-all" frame instead — see DESIGN.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColdStartPolicy {
    #[default]
    Skip,
    EmitAddedAll,
}

pub struct DiffWorkerConfig {
    pub symbols: Vec<String>,
    pub interval_sec: u64,
    pub cold_start_policy: ColdStartPolicy,
}

pub struct DiffWorker<B: Bus> {
    config: DiffWorkerConfig,
    bus: Arc<B>,
}

impl<B: Bus> DiffWorker<B> {
    pub fn new(config: DiffWorkerConfig, bus: Arc<B>) -> Self {
        Self { config, bus }
    }

    pub fn spawn(self, cancel: CancellationToken) -> tokio::task::JoinHandle<()>
    where
        B: 'static,
    {
        tokio::spawn(async move {
            let interval = std::time::Duration::from_secs(self.config.interval_sec.max(1));
            loop {
                for symbol in &self.config.symbols {
                    self.run_symbol(symbol).await;
                }
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
        })
    }

    async fn run_symbol(&self, symbol: &str) {
        let current = match self.read_frame(&keys::chain_full(symbol)).await {
            Some(f) => f,
            None => return,
        };

        let prev = match self.read_frame(&keys::chain_full_prev(symbol)).await {
            Some(f) => f,
            None => {
                if self.config.cold_start_policy == ColdStartPolicy::EmitAddedAll {
                    let added_all = DiffFrame { added: current.contracts.clone(), removed: Vec::new(), changed: Vec::new() };
                    self.write_diff(symbol, &added_all).await;
                    self.rotate(symbol, &current).await;
                }
                return;
            }
        };

        if current.frame_ts < prev.frame_ts {
            warn!(symbol, "current frame is older than prev, skipping diff cycle");
            return;
        }

        let diff = chainfeed_core::compute_diff(&prev, &current);
        self.write_diff(symbol, &diff).await;
        self.publish_expirations(symbol, &current).await;
        self.rotate(symbol, &current).await;
    }

    /// Distill the current frame's expiries to the default DTE window and
    /// publish them under `expirations:{symbol}`. Best-effort: a failure
    /// here never blocks the diff cycle itself.
    async fn publish_expirations(&self, symbol: &str, current: &ChainFeed) {
        let summary = expiration::summarize_now(current);
        debug!(symbol, count = summary.count, "distilled expiration window");
        let Ok(json) = serde_json::to_string(&summary) else { return };
        if let Err(err) = self.bus.set(&keys::expirations(symbol), json, None).await {
            warn!(symbol, error = %err, "failed to publish expiration summary");
        }
    }

    async fn read_frame(&self, key: &str) -> Option<ChainFeed> {
        let raw = self.bus.get(key).await.ok().flatten()?;
        match serde_json::from_str::<ChainFeed>(&raw) {
            Ok(feed) => Some(feed.normalized()),
            Err(err) => {
                warn!(key, error = %err, "malformed chain feed on bus, skipping diff cycle");
                None
            }
        }
    }

    async fn write_diff(&self, symbol: &str, diff: &DiffFrame) {
        let Ok(json) = serde_json::to_string(diff) else { return };
        if let Err(err) = self.bus.set(&keys::chain_diff(symbol), json, Some(Ttl::seconds(20))).await {
            warn!(symbol, error = %err, "failed to write diff frame");
            return;
        }
        info!(symbol, added = diff.added.len(), removed = diff.removed.len(), changed = diff.changed.len(), "wrote diff frame");
    }

    async fn rotate(&self, symbol: &str, current: &ChainFeed) {
        let Ok(json) = serde_json::to_string(current) else { return };
        if let Err(err) = self.bus.set(&keys::chain_full_prev(symbol), json, Some(Ttl::seconds(20))).await {
            warn!(symbol, error = %err, "failed to rotate current frame into prev");
        }
    }
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
