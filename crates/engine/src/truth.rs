// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The truth service: single in-process owner of the canonical
//! configuration document. Holds it behind an `ArcSwap` so every reader
//! gets a consistent, immutable snapshot without taking a lock, and so a
//! concurrent update is a single pointer swap no reader can observe half
//! of.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use chainfeed_bus::Bus;
use chainfeed_core::keys;
use chainfeed_core::{Truth, Version};
use parking_lot::Mutex;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum TruthError {
    #[error("no seed truth document found at any candidate path")]
    SeedNotFound,

    #[error("failed to read seed truth document: {0}")]
    Io(#[from] std::io::Error),

    #[error("seed truth document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("bus error: {0}")]
    Bus(#[from] chainfeed_bus::BusError),
}

/// Candidate paths tried in order when no explicit override is given.
fn seed_candidates(path_override: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(p) = path_override {
        candidates.push(p.to_path_buf());
    }
    candidates.push(PathBuf::from("./canonical_truth.json"));
    candidates.push(PathBuf::from("./config/canonical_truth.json"));
    candidates.push(PathBuf::from("/etc/chainfeed/canonical_truth.json"));
    candidates
}

/// Load the local seed document from the first candidate path that exists.
/// Fatal (returns `Err`) if none of them do — a node with neither a local
/// seed nor anything already in the bus has nothing to start from.
pub fn load_seed(path_override: Option<&Path>) -> Result<Truth, TruthError> {
    for candidate in seed_candidates(path_override) {
        if candidate.exists() {
            let raw = std::fs::read_to_string(&candidate)?;
            let truth: Truth = serde_json::from_str(&raw)?;
            info!(path = %candidate.display(), version = %truth.version, "loaded seed truth document");
            return Ok(truth);
        }
    }
    Err(TruthError::SeedNotFound)
}

/// Single owner of the in-memory configuration document.
///
/// Cloning a `TruthService` is cheap (it shares the underlying `ArcSwap`);
/// every worker that reads truth holds a clone.
#[derive(Clone)]
pub struct TruthService {
    inner: Arc<ArcSwap<Truth>>,
    bus: Arc<dyn Bus>,
    /// Serializes `publish_update`'s load→mutate→store critical section —
    /// the one write lock the Truth Service is allowed per spec.md §5, so
    /// two concurrent updates on the same node bump the version one at a
    /// time instead of racing onto the same new version.
    write_lock: Arc<Mutex<()>>,
}

impl TruthService {
    pub fn new(seed: Truth, bus: Arc<dyn Bus>) -> Self {
        Self { inner: Arc::new(ArcSwap::from_pointee(seed)), bus, write_lock: Arc::new(Mutex::new(())) }
    }

    /// Current snapshot. Never blocks; never torn.
    pub fn get(&self) -> Arc<Truth> {
        self.inner.load_full()
    }

    /// Read `truth:integration:schema` from the bus. If present and newer
    /// than the in-memory version, adopt it; otherwise publish the local
    /// copy so the bus converges to this node's view.
    pub async fn sync_with_bus(&self) -> Result<(), TruthError> {
        match self.bus.get(keys::TRUTH_SCHEMA).await? {
            Some(raw) => match serde_json::from_str::<Truth>(&raw) {
                Ok(remote) => {
                    self.adopt_if_newer(remote);
                }
                Err(err) => {
                    warn!(error = %err, "malformed truth document on bus during sync, keeping local copy");
                    self.publish_local().await?;
                }
            },
            None => self.publish_local().await?,
        }
        Ok(())
    }

    /// Replace the in-memory document with `candidate` only if its version
    /// is strictly newer than what's currently held. Never regresses.
    pub fn adopt_if_newer(&self, candidate: Truth) -> bool {
        let current = self.inner.load();
        if candidate.version > current.version {
            let version = candidate.version.clone();
            self.inner.store(Arc::new(candidate));
            info!(version = %version, "adopted newer truth document");
            true
        } else {
            false
        }
    }

    async fn publish_local(&self) -> Result<(), TruthError> {
        let snapshot = self.get();
        let raw = serde_json::to_string(&*snapshot)?;
        self.bus.set(keys::TRUTH_SCHEMA, raw, None).await?;
        Ok(())
    }

    /// Mutate the document under the service's single write path,
    /// bumping the patch version and refreshing `metadata.last_updated`,
    /// then publish the new document to the bus and announce it on
    /// `truth:update:schema`.
    pub async fn publish_update(&self, mutate: impl FnOnce(&mut Truth)) -> Result<Arc<Truth>, TruthError> {
        let snapshot = {
            // Holds the write lock only across the in-memory load→mutate→
            // bump→store critical section, never across the bus I/O below,
            // so two concurrent callers never read the same base version
            // and bump to the same new one.
            let _guard = self.write_lock.lock();
            let mut next = (*self.get()).clone();
            mutate(&mut next);
            next.version = next.version.bump_patch();
            next.metadata.last_updated = Some(chrono::Utc::now());
            self.inner.store(Arc::new(next));
            self.get()
        };
        let raw = serde_json::to_string(&*snapshot)?;

        self.bus.set(keys::TRUTH_SCHEMA, raw.clone(), None).await?;
        self.bus.publish(keys::CHANNEL_TRUTH_UPDATE, raw).await?;
        info!(version = %snapshot.version, "published truth update");
        Ok(snapshot)
    }

    /// Spawn a task listening on `truth:update:schema`; each message is
    /// parsed and adopted if newer. Malformed messages are logged and
    /// skipped — the listener never terminates on a bad payload.
    pub fn subscribe(&self, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let mut sub = match this.bus.subscribe(keys::CHANNEL_TRUTH_UPDATE).await {
                Ok(sub) => sub,
                Err(err) => {
                    warn!(error = %err, "failed to subscribe to truth update channel");
                    return;
                }
            };
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    msg = sub.recv() => {
                        let Some(msg) = msg else { break };
                        match serde_json::from_str::<Truth>(&msg.payload) {
                            Ok(candidate) => {
                                this.adopt_if_newer(candidate);
                            }
                            Err(err) => {
                                warn!(error = %err, "malformed truth update message, ignoring");
                            }
                        }
                    }
                }
            }
        })
    }
}

/// Ordering helper re-exported for property tests: feeding a shuffled
/// sequence of version strings through this must never let an earlier
/// adoption register a version greater than a later one.
pub fn is_strictly_newer(candidate: &Version, current: &Version) -> bool {
    candidate > current
}

#[cfg(test)]
#[path = "truth_tests.rs"]
mod tests;
