// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single option-chain snapshot ("frame").

use crate::contract::OptionContract;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One snapshot of an underlying's option chain at `frame_ts`.
///
/// Invariant: `count == contracts.len()` — enforced by construction through
/// [`ChainFeed::new`] rather than trusted from the wire; a deserialized
/// payload with a mismatched `count` is corrected on load rather than
/// propagated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainFeed {
    pub symbol: String,
    pub source: String,
    pub frame_ts: DateTime<Utc>,
    pub count: usize,
    pub contracts: Vec<OptionContract>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ChainFeed {
    pub fn new(
        symbol: impl Into<String>,
        source: impl Into<String>,
        frame_ts: DateTime<Utc>,
        contracts: Vec<OptionContract>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            source: source.into(),
            frame_ts,
            count: contracts.len(),
            contracts,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

impl ChainFeed {
    /// Reconcile `count` with the actual contract list after deserializing
    /// from an untrusted source (the bus). Call this instead of trusting a
    /// wire-supplied `count` directly.
    pub fn normalized(mut self) -> Self {
        self.count = self.contracts.len();
        self
    }
}

#[cfg(test)]
#[path = "chainfeed_tests.rs"]
mod tests;
