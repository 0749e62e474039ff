// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chainfeed-providers: the external-collaborator boundary — fetching raw
//! option chains (`FetchChain(symbol) → RawChain`) and RSS entries
//! (`FetchRSS(url) → Entries`) — plus the normalizers that turn vendor
//! shapes into the canonical [`chainfeed_core::OptionContract`] model.

pub mod chain_provider;
pub mod error;
pub mod google_alerts;
pub mod normalize;
pub mod rss_source;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use chain_provider::{ChainProvider, HttpChainProvider, ProviderTable, RawChain, CHAIN_FETCH_TIMEOUT};
pub use error::ProviderError;
pub use google_alerts::canonical_url;
pub use normalize::{normalizer_for, CompactNormalizer, NormalizeReport, Normalizer, PolygonNormalizer};
pub use rss_source::{entries_from_channel, HttpRssSource, RssEntry, RssSource, RSS_FETCH_TIMEOUT};

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeChainProvider, FakeRssSource};
