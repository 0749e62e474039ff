// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RSS Worker: one per enabled `providers.rss_feeds.<group>`. Polls every
//! configured source, decodes Google Alerts redirects, drops stale
//! entries, hashes a stable UID per canonical URL, and writes each entry
//! plus a per-poll metrics record.

use std::sync::Arc;

use chainfeed_bus::{Bus, Ttl};
use chainfeed_core::{keys, Clock};
use chainfeed_providers::{canonical_url, RssSource};
use chrono::Duration as ChronoDuration;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Entries older than this are dropped rather than written, regardless of
/// whether they were already seen.
const MAX_AGE_DAYS: i64 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssArticleRecord {
    pub group: String,
    pub source: String,
    pub title: String,
    pub url: String,
    pub published: Option<chrono::DateTime<chrono::Utc>>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RssMetricsStatus {
    Ok,
    Degraded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssMetrics {
    pub status: RssMetricsStatus,
    pub new_items: usize,
    pub errors: usize,
    pub sources_checked: usize,
    pub last_poll: chrono::DateTime<chrono::Utc>,
}

pub struct RssSourceSpec {
    pub name: String,
    pub url: String,
}

pub struct RssWorkerConfig {
    pub group: String,
    pub poll_interval_sec: u64,
    pub is_google_alerts: bool,
    pub sources: Vec<RssSourceSpec>,
}

/// Stable UID for an entry: SHA-256 hex of its canonical URL. Deterministic
/// regardless of which source or group the entry was seen through.
pub fn entry_uid(canonical_url: &str) -> String {
    let digest = Sha256::digest(canonical_url.as_bytes());
    hex_encode(&digest)
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

pub struct RssWorker<S: RssSource, B: Bus, C: Clock> {
    config: RssWorkerConfig,
    source: Arc<S>,
    bus: Arc<B>,
    clock: C,
}

impl<S: RssSource, B: Bus, C: Clock> RssWorker<S, B, C> {
    pub fn new(config: RssWorkerConfig, source: Arc<S>, bus: Arc<B>, clock: C) -> Self {
        Self { config, source, bus, clock }
    }

    pub fn spawn(self, cancel: CancellationToken) -> tokio::task::JoinHandle<()>
    where
        S: 'static,
        B: 'static,
        C: 'static,
    {
        tokio::spawn(async move {
            let interval = std::time::Duration::from_secs(self.config.poll_interval_sec.max(1));
            loop {
                self.poll_all().await;
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
        })
    }

    async fn poll_all(&self) {
        let now = self.clock.now_utc();
        let max_age = ChronoDuration::days(MAX_AGE_DAYS);
        let mut new_items = 0usize;
        let mut errors = 0usize;

        for source in &self.config.sources {
            match self.source.fetch(&source.url).await {
                Ok(entries) => {
                    for entry in entries {
                        let Some(published) = entry.published else { continue };
                        if now.signed_duration_since(published) > max_age {
                            continue;
                        }
                        let canonical = canonical_url(&entry.url, self.config.is_google_alerts);
                        let uid = entry_uid(&canonical);
                        let record = RssArticleRecord {
                            group: self.config.group.clone(),
                            source: source.name.clone(),
                            title: entry.title,
                            url: canonical,
                            published: entry.published,
                            timestamp: now,
                        };
                        let Ok(json) = serde_json::to_string(&record) else { continue };
                        let ttl = Ttl::seconds(2 * self.config.poll_interval_sec.max(1));
                        match self.bus.set(&keys::rss_entry(&self.config.group, &uid), json, Some(ttl)).await {
                            Ok(()) => new_items += 1,
                            Err(err) => {
                                warn!(group = %self.config.group, error = %err, "failed to write rss entry");
                                errors += 1;
                            }
                        }
                    }
                }
                Err(err) => {
                    warn!(group = %self.config.group, source = %source.name, error = %err, "rss fetch failed");
                    errors += 1;
                }
            }
        }

        let metrics = RssMetrics {
            status: if errors > 0 { RssMetricsStatus::Degraded } else { RssMetricsStatus::Ok },
            new_items,
            errors,
            sources_checked: self.config.sources.len(),
            last_poll: now,
        };
        if let Ok(json) = serde_json::to_string(&metrics) {
            if let Err(err) = self.bus.set(&keys::rss_metrics(&self.config.group), json, None).await {
                warn!(group = %self.config.group, error = %err, "failed to write rss metrics");
            }
        }
        info!(group = %self.config.group, new_items, errors, "rss poll complete");
    }
}

#[cfg(test)]
#[path = "rss_tests.rs"]
mod tests;
