// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expiration window helper, additive to the bus contract: distills a
//! chain frame's distinct expiries to a days-to-expiry window. Grounded on
//! the original `ExpirationInspector`, minus its own HTTP fetch path —
//! here the expiries come from a `ChainFeed` the raw/diff workers already
//! hold, not a second round-trip to the provider.

use chainfeed_core::{ChainFeed, OptionContract};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Default days-to-expiry window, matching the original inspector's
/// `max_dte=10` default.
pub const DEFAULT_MAX_DTE: i64 = 10;

/// Per-symbol expiration metadata, published under `expirations:{symbol}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationSummary {
    pub symbol: String,
    pub valid_expirations: Vec<NaiveDate>,
    pub count: usize,
    pub last_updated: DateTime<Utc>,
}

/// Every distinct expiry present in `contracts`, sorted ascending.
pub fn distinct_expiries(contracts: &[OptionContract]) -> Vec<NaiveDate> {
    let mut expiries: Vec<NaiveDate> = contracts.iter().map(|c| c.expiry).collect();
    expiries.sort_unstable();
    expiries.dedup();
    expiries
}

/// Expiries in `expiries` whose days-to-expiry from `today` falls in
/// `[0, max_dte]`. Expiries already in the past are dropped, not clamped.
pub fn within_dte_window(expiries: &[NaiveDate], today: NaiveDate, max_dte: i64) -> Vec<NaiveDate> {
    expiries
        .iter()
        .copied()
        .filter(|exp| {
            let dte = (*exp - today).num_days();
            (0..=max_dte).contains(&dte)
        })
        .collect()
}

/// True when `date` is one of `chain`'s distinct expiries, regardless of
/// the DTE window (mirrors the original's `is_valid_expiration`, which
/// checks cached expirations rather than the windowed subset).
pub fn is_valid_expiration(chain: &ChainFeed, date: NaiveDate) -> bool {
    chain.contracts.iter().any(|c| c.expiry == date)
}

/// Summarize `chain`'s expiries within `max_dte` days of `today`.
pub fn summarize(chain: &ChainFeed, today: NaiveDate, max_dte: i64) -> ExpirationSummary {
    let expiries = distinct_expiries(&chain.contracts);
    let windowed = within_dte_window(&expiries, today, max_dte);
    ExpirationSummary {
        symbol: chain.symbol.clone(),
        count: windowed.len(),
        valid_expirations: windowed,
        last_updated: Utc::now(),
    }
}

/// Convenience wrapper using the wall clock for `today`, the form the diff
/// worker's logging path uses.
pub fn summarize_now(chain: &ChainFeed) -> ExpirationSummary {
    summarize(chain, Utc::now().date_naive(), DEFAULT_MAX_DTE)
}

#[cfg(test)]
#[path = "expiration_tests.rs"]
mod tests;
