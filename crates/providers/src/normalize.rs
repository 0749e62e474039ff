// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Vendor payload → [`OptionContract`] normalization across the two vendor
//! shapes seen in practice: a nested Polygon-style snapshot object, and a
//! flat `{ticker,k,cp,q}` compact shape. Malformed entries are dropped and
//! counted rather than failing the whole frame.

use chainfeed_core::{ContractType, OptionContract};
use chrono::NaiveDate;
use serde_json::Value;

/// Accepted/dropped counts for one normalization pass, logged at `warn`
/// when `dropped > 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub accepted: usize,
    pub dropped: usize,
}

pub trait Normalizer: Send + Sync + 'static {
    /// Normalize a raw vendor payload into contracts plus a drop count.
    /// Never fails outright — an unparseable top-level shape yields zero
    /// accepted contracts and the drop count set to whatever could be
    /// partially enumerated.
    fn normalize(&self, raw: &Value) -> (Vec<OptionContract>, NormalizeReport);
}

/// Polygon-shaped nested response: `{"results": [{"details": {...},
/// "last_quote": {...}, "greeks": {...}, "open_interest": ..., "day": {...}},
/// ...]}`.
pub struct PolygonNormalizer;

impl Normalizer for PolygonNormalizer {
    fn normalize(&self, raw: &Value) -> (Vec<OptionContract>, NormalizeReport) {
        let mut report = NormalizeReport::default();
        let results = match raw.get("results").and_then(Value::as_array) {
            Some(arr) => arr,
            None => return (Vec::new(), report),
        };

        let mut contracts = Vec::with_capacity(results.len());
        for entry in results {
            match normalize_polygon_entry(entry) {
                Some(contract) => {
                    contracts.push(contract);
                    report.accepted += 1;
                }
                None => report.dropped += 1,
            }
        }
        (contracts, report)
    }
}

fn normalize_polygon_entry(entry: &Value) -> Option<OptionContract> {
    let details = entry.get("details")?;
    let contract_type = details
        .get("contract_type")
        .and_then(Value::as_str)
        .and_then(ContractType::parse)?;
    let strike = details.get("strike_price").and_then(Value::as_f64)?;
    let expiry = details
        .get("expiration_date")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())?;

    let last_quote = entry.get("last_quote");
    let greeks = entry.get("greeks");
    let day = entry.get("day");

    Some(OptionContract {
        contract_type,
        strike,
        expiry,
        bid: last_quote.and_then(|q| q.get("bid")).and_then(Value::as_f64),
        ask: last_quote.and_then(|q| q.get("ask")).and_then(Value::as_f64),
        mark: entry.get("fair_market_value").and_then(Value::as_f64),
        iv: entry.get("implied_volatility").and_then(Value::as_f64),
        delta: greeks.and_then(|g| g.get("delta")).and_then(Value::as_f64),
        gamma: greeks.and_then(|g| g.get("gamma")).and_then(Value::as_f64),
        theta: greeks.and_then(|g| g.get("theta")).and_then(Value::as_f64),
        vega: greeks.and_then(|g| g.get("vega")).and_then(Value::as_f64),
        oi: entry.get("open_interest").and_then(Value::as_f64),
        volume: day.and_then(|d| d.get("volume")).and_then(Value::as_f64),
        updated: None,
    })
}

/// Flat compact shape: `{"chain": [{"ticker":"SPX","cp":"C","k":4500.0,
/// "exp":"2025-01-17","bid":1.0,"ask":1.2}, ...]}` — seen from lower-volume
/// vendors in the original source.
pub struct CompactNormalizer;

impl Normalizer for CompactNormalizer {
    fn normalize(&self, raw: &Value) -> (Vec<OptionContract>, NormalizeReport) {
        let mut report = NormalizeReport::default();
        let entries = match raw.get("chain").and_then(Value::as_array) {
            Some(arr) => arr,
            None => return (Vec::new(), report),
        };

        let mut contracts = Vec::with_capacity(entries.len());
        for entry in entries {
            match normalize_compact_entry(entry) {
                Some(contract) => {
                    contracts.push(contract);
                    report.accepted += 1;
                }
                None => report.dropped += 1,
            }
        }
        (contracts, report)
    }
}

fn normalize_compact_entry(entry: &Value) -> Option<OptionContract> {
    let contract_type = entry.get("cp").and_then(Value::as_str).and_then(ContractType::parse)?;
    let strike = entry.get("k").and_then(Value::as_f64)?;
    let expiry = entry
        .get("exp")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())?;

    Some(OptionContract {
        contract_type,
        strike,
        expiry,
        bid: entry.get("bid").and_then(Value::as_f64),
        ask: entry.get("ask").and_then(Value::as_f64),
        mark: entry.get("mark").and_then(Value::as_f64),
        iv: entry.get("iv").and_then(Value::as_f64),
        delta: entry.get("delta").and_then(Value::as_f64),
        gamma: entry.get("gamma").and_then(Value::as_f64),
        theta: entry.get("theta").and_then(Value::as_f64),
        vega: entry.get("vega").and_then(Value::as_f64),
        oi: entry.get("oi").and_then(Value::as_f64),
        volume: entry.get("volume").and_then(Value::as_f64),
        updated: None,
    })
}

/// Resolve the normalizer paired with a provider by name. Unknown providers
/// fall back to [`CompactNormalizer`], matching the original's permissive
/// default rather than refusing to ingest an unrecognized vendor outright.
pub fn normalizer_for(provider_name: &str) -> Box<dyn Normalizer> {
    match provider_name {
        "polygon" => Box::new(PolygonNormalizer),
        _ => Box::new(CompactNormalizer),
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
