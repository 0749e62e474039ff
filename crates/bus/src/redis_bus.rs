// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `RedisBus`: the production [`Bus`] implementation, wrapping
//! `redis::aio::ConnectionManager`. Every call is bounded by a 2s timeout
//! and retried up to three times with capped backoff, matching
//! [`chainfeed_core::retry`].

use crate::client::{Bus, PubSubMessage, Subscription};
use crate::error::BusError;
use crate::pipeline::{Pipeline, PipelineOp};
use crate::ttl::Ttl;
use async_trait::async_trait;
use chainfeed_core::retry_with_backoff;
use futures_util::StreamExt;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

/// Every bus op is bounded by this timeout before it counts as a failed
/// attempt.
const OP_TIMEOUT: Duration = Duration::from_secs(2);

pub struct RedisBus {
    manager: ConnectionManager,
    client: redis::Client,
}

impl RedisBus {
    pub async fn connect(url: &str) -> Result<Self, BusError> {
        let client = redis::Client::open(url).map_err(BusError::from)?;
        let manager = client.get_connection_manager().await.map_err(BusError::from)?;
        Ok(Self { manager, client })
    }

    async fn with_retry<T, F, Fut>(&self, op: F) -> Result<T, BusError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, BusError>>,
    {
        retry_with_backoff(|| async {
            match tokio::time::timeout(OP_TIMEOUT, op()).await {
                Ok(result) => result,
                Err(_) => Err(BusError::Transient("bus operation timed out".into())),
            }
        })
        .await
    }
}

#[async_trait]
impl Bus for RedisBus {
    async fn get(&self, key: &str) -> Result<Option<String>, BusError> {
        self.with_retry(|| async {
            let mut conn = self.manager.clone();
            let value: Option<String> = conn.get(key).await.map_err(BusError::from)?;
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Ttl>) -> Result<(), BusError> {
        let resolved = ttl.unwrap_or_else(|| self.ttl_policy(key));
        self.with_retry(|| {
            let value = value.clone();
            async move {
                let mut conn = self.manager.clone();
                match resolved.as_secs() {
                    Some(secs) => conn.set_ex::<_, _, ()>(key, &value, secs).await.map_err(BusError::from)?,
                    None => conn.set::<_, _, ()>(key, &value).await.map_err(BusError::from)?,
                }
                Ok(())
            }
        })
        .await
    }

    async fn hset(&self, hash: &str, field: &str, value: String) -> Result<(), BusError> {
        self.with_retry(|| {
            let value = value.clone();
            async move {
                let mut conn = self.manager.clone();
                conn.hset::<_, _, _, ()>(hash, field, value).await.map_err(BusError::from)
            }
        })
        .await
    }

    async fn hdel(&self, hash: &str, field: &str) -> Result<(), BusError> {
        self.with_retry(|| async {
            let mut conn = self.manager.clone();
            conn.hdel::<_, _, ()>(hash, field).await.map_err(BusError::from)
        })
        .await
    }

    async fn hgetall(&self, hash: &str) -> Result<HashMap<String, String>, BusError> {
        self.with_retry(|| async {
            let mut conn = self.manager.clone();
            let map: HashMap<String, String> = conn.hgetall(hash).await.map_err(BusError::from)?;
            Ok(map)
        })
        .await
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, BusError> {
        self.with_retry(|| async {
            let mut conn = self.manager.clone();
            let found: Vec<String> = conn.keys(pattern).await.map_err(BusError::from)?;
            Ok(found)
        })
        .await
    }

    async fn publish(&self, channel: &str, message: String) -> Result<(), BusError> {
        self.with_retry(|| {
            let message = message.clone();
            async move {
                let mut conn = self.manager.clone();
                conn.publish::<_, _, ()>(channel, message).await.map_err(BusError::from)
            }
        })
        .await
    }

    async fn subscribe(&self, pattern: &str) -> Result<Subscription, BusError> {
        let mut pubsub = self.client.get_async_pubsub().await.map_err(BusError::from)?;
        pubsub.psubscribe(pattern).await.map_err(BusError::from)?;

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut stream = pubsub.on_message();
            while let Some(msg) = stream.next().await {
                let channel = msg.get_channel_name().to_string();
                let payload: String = match msg.get_payload() {
                    Ok(p) => p,
                    Err(err) => {
                        warn!(error = %err, "dropping malformed pubsub payload");
                        continue;
                    }
                };
                if tx.send(PubSubMessage { channel, payload }).is_err() {
                    break;
                }
            }
        });

        Ok(Subscription { rx })
    }

    async fn pipeline(&self, pipeline: Pipeline) -> Result<(), BusError> {
        if pipeline.is_empty() {
            return Ok(());
        }
        self.with_retry(|| {
            let pipeline = pipeline.clone();
            async move {
                let mut conn = self.manager.clone();
                let mut pipe = redis::pipe();
                pipe.atomic();
                for op in pipeline.ops() {
                    match op {
                        PipelineOp::Set { key, value, ttl } => {
                            let resolved = ttl.unwrap_or_else(|| crate::ttl::ttl_for_key(key));
                            match resolved.as_secs() {
                                Some(secs) => {
                                    pipe.set_ex(key, value, secs);
                                }
                                None => {
                                    pipe.set(key, value);
                                }
                            }
                        }
                        PipelineOp::Hset { hash, field, value } => {
                            pipe.hset(hash, field, value);
                        }
                        PipelineOp::Hdel { hash, field } => {
                            pipe.hdel(hash, field);
                        }
                        PipelineOp::Publish { channel, message } => {
                            pipe.publish(channel, message);
                        }
                    }
                }
                pipe.query_async::<()>(&mut conn).await.map_err(BusError::from)
            }
        })
        .await
    }
}

#[cfg(test)]
#[path = "redis_bus_tests.rs"]
mod tests;
