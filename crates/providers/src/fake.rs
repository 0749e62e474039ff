// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake providers backing every engine-crate worker test. Available in
//! this crate's own tests and, via the `test-support` feature, to
//! downstream crates.

#![cfg(any(test, feature = "test-support"))]

use crate::chain_provider::{ChainProvider, RawChain};
use crate::error::ProviderError;
use crate::rss_source::{RssEntry, RssSource};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

/// Either a canned success payload or a canned failure, selected once at
/// construction — matches the failing/ok fixture idiom.
enum Fixture<T> {
    Ok(T),
    Err(String),
}

pub struct FakeChainProvider {
    name: String,
    fixture: Mutex<Fixture<RawChain>>,
    calls: Mutex<usize>,
}

impl FakeChainProvider {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self { name: name.into(), fixture: Mutex::new(Fixture::Ok(payload)), calls: Mutex::new(0) }
    }

    pub fn failing(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { name: name.into(), fixture: Mutex::new(Fixture::Err(reason.into())), calls: Mutex::new(0) }
    }

    pub fn set_payload(&self, payload: Value) {
        *self.fixture.lock() = Fixture::Ok(payload);
    }

    pub fn set_failing(&self, reason: impl Into<String>) {
        *self.fixture.lock() = Fixture::Err(reason.into());
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl ChainProvider for FakeChainProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_chain(&self, _symbol: &str) -> Result<RawChain, ProviderError> {
        *self.calls.lock() += 1;
        match &*self.fixture.lock() {
            Fixture::Ok(payload) => Ok(payload.clone()),
            Fixture::Err(reason) => Err(ProviderError::Transient(reason.clone())),
        }
    }
}

/// An in-memory RSS source keyed by feed URL, so tests can configure
/// distinct entries per source without a network round-trip.
#[derive(Default)]
pub struct FakeRssSource {
    feeds: Mutex<HashMap<String, Vec<RssEntry>>>,
}

impl FakeRssSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(self, url: impl Into<String>, entries: Vec<RssEntry>) -> Self {
        self.feeds.lock().insert(url.into(), entries);
        self
    }
}

#[async_trait]
impl RssSource for FakeRssSource {
    async fn fetch(&self, url: &str) -> Result<Vec<RssEntry>, ProviderError> {
        Ok(self.feeds.lock().get(url).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
