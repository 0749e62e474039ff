// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::chainfeed::ChainFeed;
use crate::contract::ContractType;
use chrono::{NaiveDate, Utc};

fn contract(contract_type: ContractType, strike: f64, bid: Option<f64>) -> OptionContract {
    OptionContract {
        contract_type,
        strike,
        expiry: NaiveDate::from_ymd_opt(2025, 1, 17).unwrap(),
        bid,
        ask: None,
        mark: None,
        iv: None,
        delta: None,
        gamma: None,
        theta: None,
        vega: None,
        oi: None,
        volume: None,
        updated: None,
    }
}

fn feed(contracts: Vec<OptionContract>) -> ChainFeed {
    ChainFeed::new("SPX", "polygon", Utc::now(), contracts)
}

#[test]
fn detects_added_contracts() {
    let prev = feed(vec![contract(ContractType::Call, 100.0, None)]);
    let current = feed(vec![
        contract(ContractType::Call, 100.0, None),
        contract(ContractType::Call, 105.0, None),
    ]);
    let diff = compute_diff(&prev, &current);
    assert_eq!(diff.added.len(), 1);
    assert_eq!(diff.added[0].strike, 105.0);
    assert!(diff.removed.is_empty());
    assert!(diff.changed.is_empty());
}

#[test]
fn detects_removed_contracts() {
    let prev = feed(vec![
        contract(ContractType::Call, 100.0, None),
        contract(ContractType::Call, 105.0, None),
    ]);
    let current = feed(vec![contract(ContractType::Call, 100.0, None)]);
    let diff = compute_diff(&prev, &current);
    assert_eq!(diff.removed.len(), 1);
    assert_eq!(diff.removed[0].strike, 105.0);
    assert!(diff.added.is_empty());
}

#[test]
fn detects_field_level_changes() {
    let prev = feed(vec![contract(ContractType::Call, 100.0, Some(1.0))]);
    let current = feed(vec![contract(ContractType::Call, 100.0, Some(1.5))]);
    let diff = compute_diff(&prev, &current);
    assert_eq!(diff.changed.len(), 1);
    assert_eq!(diff.changed[0].field_changes.len(), 1);
    assert_eq!(diff.changed[0].field_changes[0].field, "bid");
}

#[test]
fn unchanged_contracts_produce_no_diff() {
    let prev = feed(vec![contract(ContractType::Call, 100.0, Some(1.0))]);
    let current = feed(vec![contract(ContractType::Call, 100.0, Some(1.0))]);
    let diff = compute_diff(&prev, &current);
    assert!(diff.added.is_empty() && diff.removed.is_empty() && diff.changed.is_empty());
}

#[test]
fn calls_and_puts_at_same_strike_are_distinct() {
    let prev = feed(vec![contract(ContractType::Call, 100.0, None)]);
    let current = feed(vec![
        contract(ContractType::Call, 100.0, None),
        contract(ContractType::Put, 100.0, None),
    ]);
    let diff = compute_diff(&prev, &current);
    assert_eq!(diff.added.len(), 1);
    assert_eq!(diff.added[0].contract_type, ContractType::Put);
}

#[test]
fn apply_diff_round_trips_additions() {
    let prev = feed(vec![contract(ContractType::Call, 100.0, None)]);
    let current = feed(vec![
        contract(ContractType::Call, 100.0, None),
        contract(ContractType::Call, 105.0, None),
    ]);
    let diff = compute_diff(&prev, &current);
    let mut reconstructed = apply_diff(&prev, &diff);
    let mut expected = current.contracts.clone();
    reconstructed.sort_by(|a, b| a.key().cmp(&b.key()));
    expected.sort_by(|a, b| a.key().cmp(&b.key()));
    assert_eq!(reconstructed, expected);
}

#[test]
fn apply_diff_round_trips_removals_and_changes() {
    let prev = feed(vec![
        contract(ContractType::Call, 100.0, Some(1.0)),
        contract(ContractType::Call, 105.0, None),
    ]);
    let current = feed(vec![contract(ContractType::Call, 100.0, Some(2.0))]);
    let diff = compute_diff(&prev, &current);
    let mut reconstructed = apply_diff(&prev, &diff);
    let mut expected = current.contracts.clone();
    reconstructed.sort_by(|a, b| a.key().cmp(&b.key()));
    expected.sort_by(|a, b| a.key().cmp(&b.key()));
    assert_eq!(reconstructed, expected);
}

#[test]
fn empty_diff_for_identical_empty_frames() {
    let prev = feed(vec![]);
    let current = feed(vec![]);
    let diff = compute_diff(&prev, &current);
    assert_eq!(diff, DiffFrame::default());
}
