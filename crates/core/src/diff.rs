// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chain diffing: deriving an added/removed/changed frame from two
//! successive [`ChainFeed`]s of the same symbol.

use crate::chainfeed::ChainFeed;
use crate::contract::{ContractKey, OptionContract};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single field that differs between two otherwise-matching contracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub before: serde_json::Value,
    pub after: serde_json::Value,
}

/// A contract present in both frames whose fields changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractChange {
    pub contract_type: crate::contract::ContractType,
    pub strike: f64,
    pub expiry: chrono::NaiveDate,
    pub field_changes: Vec<FieldChange>,
}

/// The set of contracts added, removed, and changed between two frames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffFrame {
    pub added: Vec<OptionContract>,
    pub removed: Vec<OptionContract>,
    pub changed: Vec<ContractChange>,
}

/// Fields compared field-by-field for a changed-contract record, by name
/// alongside an accessor. Greeks and quote fields only — identity fields
/// (`contract_type`, `strike`, `expiry`) are the diff key and never appear
/// here. `updated` (the only non-numeric per-contract field) is deliberately
/// excluded: no normalizer ever populates it, and diffing it would mark
/// every contract "changed" each frame purely from a refreshed timestamp.
const COMPARED_FIELDS: &[(&str, fn(&OptionContract) -> Option<f64>)] = &[
    ("bid", |c| c.bid),
    ("ask", |c| c.ask),
    ("mark", |c| c.mark),
    ("iv", |c| c.iv),
    ("delta", |c| c.delta),
    ("gamma", |c| c.gamma),
    ("theta", |c| c.theta),
    ("vega", |c| c.vega),
    ("oi", |c| c.oi),
    ("volume", |c| c.volume),
];

/// Compute the diff between two chain frames of the same symbol.
///
/// Contracts are matched by `(contract_type, strike, expiry)`. A field is
/// reported as changed when its numeric value differs at all — the epsilon
/// is 0.0 (exact inequality), per spec.
pub fn compute_diff(prev: &ChainFeed, current: &ChainFeed) -> DiffFrame {
    let prev_by_key: HashMap<ContractKey, &OptionContract> =
        prev.contracts.iter().map(|c| (c.key(), c)).collect();
    let current_by_key: HashMap<ContractKey, &OptionContract> =
        current.contracts.iter().map(|c| (c.key(), c)).collect();

    let mut added = Vec::new();
    let mut changed = Vec::new();
    for (key, contract) in &current_by_key {
        match prev_by_key.get(key) {
            None => added.push((*contract).clone()),
            Some(prev_contract) => {
                let field_changes = diff_fields(prev_contract, contract);
                if !field_changes.is_empty() {
                    changed.push(ContractChange {
                        contract_type: key.0,
                        strike: key.1.into_inner(),
                        expiry: key.2,
                        field_changes,
                    });
                }
            }
        }
    }

    let mut removed = Vec::new();
    for (key, contract) in &prev_by_key {
        if !current_by_key.contains_key(key) {
            removed.push((*contract).clone());
        }
    }

    DiffFrame { added, removed, changed }
}

fn diff_fields(prev: &OptionContract, current: &OptionContract) -> Vec<FieldChange> {
    COMPARED_FIELDS
        .iter()
        .filter_map(|(name, accessor)| {
            let before = accessor(prev);
            let after = accessor(current);
            if before == after {
                None
            } else {
                Some(FieldChange {
                    field: name.to_string(),
                    before: serde_json::to_value(before).unwrap_or(serde_json::Value::Null),
                    after: serde_json::to_value(after).unwrap_or(serde_json::Value::Null),
                })
            }
        })
        .collect()
}

/// Apply a diff frame to `prev`, reconstructing `current`.
///
/// Used to verify the round-trip law: for every diff `D` over
/// `(prev, current)`, `apply_diff(prev, D) == current`.
pub fn apply_diff(prev: &ChainFeed, diff: &DiffFrame) -> Vec<OptionContract> {
    let removed_keys: std::collections::HashSet<ContractKey> =
        diff.removed.iter().map(|c| c.key()).collect();
    let changed_by_key: HashMap<ContractKey, &ContractChange> =
        diff.changed.iter().map(|c| ((c.contract_type, ordered_float::OrderedFloat(c.strike), c.expiry), c)).collect();

    let mut out: Vec<OptionContract> = prev
        .contracts
        .iter()
        .filter(|c| !removed_keys.contains(&c.key()))
        .map(|c| match changed_by_key.get(&c.key()) {
            None => c.clone(),
            Some(change) => apply_field_changes(c, change),
        })
        .collect();

    out.extend(diff.added.iter().cloned());
    out
}

fn apply_field_changes(contract: &OptionContract, change: &ContractChange) -> OptionContract {
    let mut updated = contract.clone();
    for fc in &change.field_changes {
        let after: Option<f64> = serde_json::from_value(fc.after.clone()).unwrap_or(None);
        match fc.field.as_str() {
            "bid" => updated.bid = after,
            "ask" => updated.ask = after,
            "mark" => updated.mark = after,
            "iv" => updated.iv = after,
            "delta" => updated.delta = after,
            "gamma" => updated.gamma = after,
            "theta" => updated.theta = after,
            "vega" => updated.vega = after,
            "oi" => updated.oi = after,
            "volume" => updated.volume = after,
            _ => {}
        }
    }
    updated
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
