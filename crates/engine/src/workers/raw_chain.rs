// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw Chain Worker: one per enabled symbol. Fetches a vendor chain
//! snapshot, normalizes it into canonical contracts, and writes it under
//! `truth:chain:raw:{SYMBOL}`. A fetch or normalizer failure skips the
//! cycle rather than failing the worker — the previous snapshot simply
//! ages out under its own TTL.

use std::sync::Arc;

use chainfeed_bus::{Bus, Ttl};
use chainfeed_core::{keys, ChainFeed, Clock, ConsecutiveFailures, WorkerStatus};
use chainfeed_providers::ChainProvider;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub struct RawChainWorker<B: Bus, C: Clock> {
    symbol: String,
    provider: Arc<dyn ChainProvider>,
    bus: Arc<B>,
    clock: C,
    interval_sec: u64,
    ttl_sec: u64,
}

impl<B: Bus, C: Clock> RawChainWorker<B, C> {
    pub fn new(symbol: impl Into<String>, provider: Arc<dyn ChainProvider>, bus: Arc<B>, clock: C, interval_sec: u64, ttl_sec: u64) -> Self {
        Self { symbol: symbol.into(), provider, bus, clock, interval_sec, ttl_sec }
    }

    pub fn spawn(self, cancel: CancellationToken) -> tokio::task::JoinHandle<()>
    where
        B: 'static,
        C: 'static,
    {
        tokio::spawn(async move {
            let mut failures = ConsecutiveFailures::new();
            let interval = std::time::Duration::from_secs(self.interval_sec.max(1));
            loop {
                self.run_cycle(&mut failures).await;
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
        })
    }

    async fn run_cycle(&self, failures: &mut ConsecutiveFailures) {
        let raw = match self.provider.fetch_chain(&self.symbol).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(symbol = %self.symbol, error = %err, "chain fetch failed, skipping cycle");
                self.note_failure(failures).await;
                return;
            }
        };

        let normalizer = chainfeed_providers::normalizer_for(self.provider.name());
        let (contracts, report) = normalizer.normalize(&raw);
        if report.dropped > 0 {
            warn!(symbol = %self.symbol, dropped = report.dropped, accepted = report.accepted, "normalizer dropped malformed entries");
        }

        let feed = ChainFeed::new(self.symbol.clone(), self.provider.name(), self.clock.now_utc(), contracts);
        let Ok(json) = serde_json::to_string(&feed) else {
            warn!(symbol = %self.symbol, "failed to serialize chain feed");
            self.note_failure(failures).await;
            return;
        };

        if let Err(err) = self.bus.set(&keys::chain_raw(&self.symbol), json, Some(Ttl::seconds(self.ttl_sec))).await {
            warn!(symbol = %self.symbol, error = %err, "failed to write raw chain");
            self.note_failure(failures).await;
            return;
        }

        if failures.record_success() {
            self.note_recovery(feed.count).await;
        }
        info!(symbol = %self.symbol, count = feed.count, "wrote raw chain frame");
    }

    async fn note_failure(&self, failures: &mut ConsecutiveFailures) {
        if failures.record_failure() {
            let status = WorkerStatus::degraded(0, self.clock.now_utc(), "three consecutive fetch failures");
            if let Ok(json) = serde_json::to_string(&status) {
                let _ = self.bus.set(&keys::feed_validation(&self.symbol), json, None).await;
            }
        }
    }

    /// Re-publishes `active` once a cycle succeeds after a published
    /// `degraded` status, so consumers watching `truth:feed:{sym}:validation`
    /// see the symbol recover rather than staying `degraded` forever.
    async fn note_recovery(&self, item_count: usize) {
        let status = WorkerStatus::active(item_count, self.clock.now_utc());
        if let Ok(json) = serde_json::to_string(&status) {
            let _ = self.bus.set(&keys::feed_validation(&self.symbol), json, None).await;
        }
    }
}

#[cfg(test)]
#[path = "raw_chain_tests.rs"]
mod tests;
