// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ingestion workers (C6): one `tokio::task` per symbol, synthetic index,
//! or RSS group, each generic over [`chainfeed_bus::Bus`] and
//! [`chainfeed_core::Clock`] so tests inject fakes instead of real I/O and
//! wall time.

pub mod diff;
pub mod market_state;
pub mod raw_chain;
pub mod rss;
pub mod synthetic;

pub use diff::{ColdStartPolicy, DiffWorker, DiffWorkerConfig};
pub use market_state::{validate_market_state, validate_market_state_now, MarketValidation};
pub use raw_chain::RawChainWorker;
pub use rss::{entry_uid, RssMetrics, RssMetricsStatus, RssSourceSpec, RssWorker, RssWorkerConfig};
pub use synthetic::{compute_synthetic_spot, SpotValidation, SyntheticSpotWorker};
