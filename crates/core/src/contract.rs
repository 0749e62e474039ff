// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Option contract model.

use chrono::{DateTime, NaiveDate, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Call or put. Always lowercase on the wire regardless of vendor casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    Call,
    Put,
}

impl ContractType {
    /// Parse a vendor-supplied contract type string case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Some(ContractType::Call),
            "put" | "p" => Some(ContractType::Put),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ContractType::Call => "call",
            ContractType::Put => "put",
        })
    }
}

/// Identifies a contract independent of its mutable quote/greek fields.
/// Used to key contracts across two successive chain frames for diffing.
pub type ContractKey = (ContractType, OrderedFloat<f64>, NaiveDate);

/// A single option contract snapshot.
///
/// Invariant: `contract_type`, `strike`, and `expiry` are never null —
/// enforced by these being non-`Option` fields; a normalizer that cannot
/// determine them must drop the contract rather than construct one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    pub contract_type: ContractType,
    pub strike: f64,
    pub expiry: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vega: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl OptionContract {
    pub fn key(&self) -> ContractKey {
        (self.contract_type, OrderedFloat(self.strike), self.expiry)
    }
}

#[cfg(test)]
#[path = "contract_tests.rs"]
mod tests;
