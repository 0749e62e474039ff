// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The duck-typed provider plug-in interface: a narrow capability trait
//! registered by name, each implementation paired with a
//! [`crate::normalize::Normalizer`].

use crate::error::ProviderError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// An opaque vendor payload — the contract explicitly leaves this
/// unstructured; only the paired [`crate::normalize::Normalizer`] knows its
/// shape.
pub type RawChain = Value;

/// Default HTTP timeout for chain provider calls.
pub const CHAIN_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait ChainProvider: Send + Sync + 'static {
    /// The provider name used as `ChainFeed::source` and in bus keys
    /// (`truth:provider:{name}:metadata`).
    fn name(&self) -> &str;

    async fn fetch_chain(&self, symbol: &str) -> Result<RawChain, ProviderError>;
}

/// `reqwest`-backed provider matching the two vendor shapes described in
/// `original_source/core/providers/polygon_adapter.py` and
/// `core/chain_normalizer.py`: a Polygon-shaped nested JSON response.
pub struct HttpChainProvider {
    name: String,
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpChainProvider {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(CHAIN_FETCH_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { name: name.into(), base_url: base_url.into(), api_key, client }
    }
}

#[async_trait]
impl ChainProvider for HttpChainProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_chain(&self, symbol: &str) -> Result<RawChain, ProviderError> {
        let url = format!("{}/v3/snapshot/options/{symbol}", self.base_url.trim_end_matches('/'));
        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.query(&[("apiKey", key.as_str())]);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Transient(format!(
                "{} returned HTTP {}",
                self.name,
                response.status()
            )));
        }
        response.json::<Value>().await.map_err(ProviderError::from)
    }
}

/// Name-keyed table of registered providers, as  step 1 iterates
/// `providers.data_providers.<name>`.
pub type ProviderTable = HashMap<String, Arc<dyn ChainProvider>>;

#[cfg(test)]
#[path = "chain_provider_tests.rs"]
mod tests;
