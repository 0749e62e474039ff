// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`Bus`] implementation used by every worker/engine test in this
//! workspace, so tests never need a live backing server.

use crate::client::{Bus, PubSubMessage, Subscription};
use crate::error::BusError;
use crate::pattern;
use crate::pipeline::{Pipeline, PipelineOp};
use crate::ttl::Ttl;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

struct Entry {
    value: String,
    inserted_at: Instant,
    ttl: Option<Duration>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        match self.ttl {
            None => false,
            Some(ttl) => self.inserted_at.elapsed() >= ttl,
        }
    }

    fn remaining(&self) -> Option<Duration> {
        self.ttl.map(|ttl| ttl.saturating_sub(self.inserted_at.elapsed()))
    }
}

#[derive(Default)]
struct Inner {
    strings: HashMap<String, Entry>,
    hashes: HashMap<String, HashMap<String, String>>,
    subscribers: Vec<(String, mpsc::UnboundedSender<PubSubMessage>)>,
}

/// An in-memory, `parking_lot::Mutex`-guarded stand-in for a real bus
/// connection. TTLs are tracked against the wall clock rather than an
/// injected [`chainfeed_core::Clock`] — tests that need to assert a TTL
/// bound use [`FakeBus::remaining_ttl`] rather than sleeping past expiry.
#[derive(Clone, Default)]
pub struct FakeBus {
    inner: Arc<Mutex<Inner>>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time left before `key` expires, or `None` if persistent or absent.
    pub fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        self.inner.lock().strings.get(key).and_then(|e| e.remaining())
    }

    /// Whether `key` is present and unexpired.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().strings.get(key).is_some_and(|e| !e.is_expired())
    }

    fn resolve_ttl(&self, key: &str, ttl: Option<Ttl>) -> Option<Duration> {
        ttl.unwrap_or_else(|| self.ttl_policy(key)).as_secs().map(Duration::from_secs)
    }
}

#[async_trait]
impl Bus for FakeBus {
    async fn get(&self, key: &str) -> Result<Option<String>, BusError> {
        let mut inner = self.inner.lock();
        if let Some(entry) = inner.strings.get(key) {
            if entry.is_expired() {
                inner.strings.remove(key);
                return Ok(None);
            }
            return Ok(Some(entry.value.clone()));
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Ttl>) -> Result<(), BusError> {
        let resolved = self.resolve_ttl(key, ttl);
        self.inner.lock().strings.insert(
            key.to_string(),
            Entry { value, inserted_at: Instant::now(), ttl: resolved },
        );
        Ok(())
    }

    async fn hset(&self, hash: &str, field: &str, value: String) -> Result<(), BusError> {
        self.inner
            .lock()
            .hashes
            .entry(hash.to_string())
            .or_default()
            .insert(field.to_string(), value);
        Ok(())
    }

    async fn hdel(&self, hash: &str, field: &str) -> Result<(), BusError> {
        if let Some(fields) = self.inner.lock().hashes.get_mut(hash) {
            fields.remove(field);
        }
        Ok(())
    }

    async fn hgetall(&self, hash: &str) -> Result<HashMap<String, String>, BusError> {
        Ok(self.inner.lock().hashes.get(hash).cloned().unwrap_or_default())
    }

    async fn keys(&self, pattern_str: &str) -> Result<Vec<String>, BusError> {
        let mut inner = self.inner.lock();
        inner.strings.retain(|_, e| !e.is_expired());
        Ok(inner
            .strings
            .keys()
            .filter(|k| pattern::matches(pattern_str, k))
            .cloned()
            .collect())
    }

    async fn publish(&self, channel: &str, message: String) -> Result<(), BusError> {
        let inner = self.inner.lock();
        for (pattern_str, tx) in &inner.subscribers {
            if pattern::matches(pattern_str, channel) {
                let _ = tx.send(PubSubMessage { channel: channel.to_string(), payload: message.clone() });
            }
        }
        Ok(())
    }

    async fn subscribe(&self, pattern_str: &str) -> Result<Subscription, BusError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.lock().subscribers.push((pattern_str.to_string(), tx));
        Ok(Subscription { rx })
    }

    async fn pipeline(&self, pipeline: Pipeline) -> Result<(), BusError> {
        // All-or-nothing: a single lock holder applies every op, so no
        // other caller ever observes a partial pipeline.
        let mut inner = self.inner.lock();
        for op in pipeline.ops() {
            match op {
                PipelineOp::Set { key, value, ttl } => {
                    let resolved = ttl.unwrap_or_else(|| crate::ttl::ttl_for_key(key)).as_secs().map(Duration::from_secs);
                    inner.strings.insert(
                        key.clone(),
                        Entry { value: value.clone(), inserted_at: Instant::now(), ttl: resolved },
                    );
                }
                PipelineOp::Hset { hash, field, value } => {
                    inner.hashes.entry(hash.clone()).or_default().insert(field.clone(), value.clone());
                }
                PipelineOp::Hdel { hash, field } => {
                    if let Some(fields) = inner.hashes.get_mut(hash) {
                        fields.remove(field);
                    }
                }
                PipelineOp::Publish { channel, message } => {
                    for (pattern_str, tx) in &inner.subscribers {
                        if pattern::matches(pattern_str, channel) {
                            let _ = tx.send(PubSubMessage { channel: channel.clone(), payload: message.clone() });
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
