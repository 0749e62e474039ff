// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Bus` capability trait: typed access to the external key/pubsub
//! store. Every worker holds an `Arc<dyn Bus>` — there is exactly one
//! shared, concurrent-safe handle per node.

use crate::error::BusError;
use crate::pipeline::Pipeline;
use crate::ttl::Ttl;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::mpsc;

/// One message delivered to a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubSubMessage {
    pub channel: String,
    pub payload: String,
}

/// A live subscription. Dropping it unsubscribes.
pub struct Subscription {
    pub(crate) rx: mpsc::UnboundedReceiver<PubSubMessage>,
}

impl Subscription {
    pub async fn recv(&mut self) -> Option<PubSubMessage> {
        self.rx.recv().await
    }
}

#[async_trait]
pub trait Bus: Send + Sync + 'static {
    /// `GET key`. `None` when the key is absent or has expired.
    async fn get(&self, key: &str) -> Result<Option<String>, BusError>;

    /// `SET key value [EX ttl]`. `ttl` overrides the prefix policy in
    /// [`crate::ttl::ttl_for_key`] when given; otherwise the policy applies.
    async fn set(&self, key: &str, value: String, ttl: Option<Ttl>) -> Result<(), BusError>;

    async fn hset(&self, hash: &str, field: &str, value: String) -> Result<(), BusError>;

    async fn hdel(&self, hash: &str, field: &str) -> Result<(), BusError>;

    /// Every field of `hash`, normalized to strings regardless of whether
    /// the backend returned bytes.
    async fn hgetall(&self, hash: &str) -> Result<HashMap<String, String>, BusError>;

    /// Keys matching a `*`-glob pattern, normalized to strings.
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, BusError>;

    async fn publish(&self, channel: &str, message: String) -> Result<(), BusError>;

    /// Subscribe to a channel (or `*`-glob pattern). Messages arrive on the
    /// returned [`Subscription`] until it is dropped.
    async fn subscribe(&self, pattern: &str) -> Result<Subscription, BusError>;

    /// Execute every op in `pipeline` as a single atomic unit: all effects
    /// are observable, or none are.
    async fn pipeline(&self, pipeline: Pipeline) -> Result<(), BusError>;

    /// Effective TTL for `set(key, ..)` when no explicit override is given.
    fn ttl_policy(&self, key: &str) -> Ttl {
        crate::ttl::ttl_for_key(key)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
