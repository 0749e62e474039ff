// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The canonical truth document: versioned configuration shared by every
//! node in the mesh.

use crate::version::Version;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The canonical configuration document, mutated only via the
/// `truth:update:schema` channel and never destroyed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truth {
    pub version: Version,
    #[serde(default)]
    pub metadata: TruthMetadata,
    #[serde(default)]
    pub chainfeed: ChainfeedConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub mesh: MeshConfig,
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
}

impl Truth {
    /// A minimal document suitable for the cold-start scenario: default
    /// version, empty config, no providers.
    pub fn seed() -> Self {
        Self {
            version: Version::from("v1.0.0"),
            metadata: TruthMetadata::default(),
            chainfeed: ChainfeedConfig::default(),
            providers: ProvidersConfig::default(),
            mesh: MeshConfig::default(),
            entities: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TruthMetadata {
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChainfeedConfig {
    #[serde(default)]
    pub default_symbols: Vec<String>,
    #[serde(default)]
    pub raw: RawConfig,
    #[serde(default)]
    pub feed_scope: IndexMap<String, FeedScope>,
    #[serde(default)]
    pub synthetic_indexes: IndexMap<String, SyntheticIndex>,
    #[serde(default)]
    pub diff_interval_sec: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub enabled: bool,
    pub interval_sec: u64,
    pub ttl_sec: u64,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self { enabled: true, interval_sec: 30, ttl_sec: 20 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedScope {
    pub update_interval_sec: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SyntheticIndex {
    #[serde(default)]
    pub components: Vec<SyntheticComponent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticComponent {
    pub symbol: String,
    pub weight: f64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub data_providers: IndexMap<String, DataProviderConfig>,
    #[serde(default)]
    pub rss_feeds: IndexMap<String, RssGroupConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataProviderConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    pub base_url: String,
}

impl DataProviderConfig {
    /// Resolve the effective API key: direct value first, falling back to
    /// the named environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(k) = &self.api_key {
            return Some(k.clone());
        }
        self.api_key_env.as_ref().and_then(|name| std::env::var(name).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RssGroupConfig {
    #[serde(default)]
    pub enabled: bool,
    pub poll_interval_sec: u64,
    #[serde(default)]
    pub is_google_alerts: bool,
    #[serde(default)]
    pub sources: Vec<RssSourceConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RssSourceConfig {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    #[serde(default = "default_heartbeat_interval_sec")]
    pub heartbeat_interval_sec: u64,
    #[serde(default = "default_max_heartbeat_age_sec")]
    pub max_heartbeat_age_sec: u64,
    #[serde(default)]
    pub node_id: Option<String>,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_sec: default_heartbeat_interval_sec(),
            max_heartbeat_age_sec: default_max_heartbeat_age_sec(),
            node_id: None,
        }
    }
}

fn default_heartbeat_interval_sec() -> u64 {
    15
}

fn default_max_heartbeat_age_sec() -> u64 {
    45
}

/// Optional identity record used for role assignment (which node owns which
/// symbols/groups). Not interpreted by the core data model itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub symbols: Vec<String>,
}

#[cfg(test)]
#[path = "truth_tests.rs"]
mod tests;
