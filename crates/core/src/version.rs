// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dotted version identifiers for the canonical truth document.
//!
//! Versions compare by splitting on `.` and comparing the resulting integer
//! tuples lexicographically; a shorter tuple is padded with zeros for the
//! missing trailing components (`"v1.4"` == `"v1.4.0"`). A leading `v` is
//! stripped before parsing but preserved in the formatted output.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A monotonically-ordered dotted version string (e.g. `"v1.4.2"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(pub String);

impl Version {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The dotted integer tuple used for ordering. Non-numeric components
    /// parse as 0 rather than causing a panic or error — a malformed
    /// version should never crash the truth-adoption path.
    fn components(&self) -> Vec<u64> {
        self.0.trim_start_matches('v').split('.').map(|c| c.parse().unwrap_or(0)).collect()
    }

    /// Returns a new version with the patch (third) component incremented.
    ///
    /// Used by `PublishUpdate`; preserves a leading `v` if present and pads
    /// missing major/minor components with 0.
    pub fn bump_patch(&self) -> Version {
        let has_v = self.0.starts_with('v');
        let mut parts = self.components();
        while parts.len() < 3 {
            parts.push(0);
        }
        parts[2] += 1;
        let joined = parts.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(".");
        Version(if has_v { format!("v{joined}") } else { joined })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Version(s.to_string())
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Version(s)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = self.components();
        let b = other.components();
        let len = a.len().max(b.len());
        for i in 0..len {
            let an = a.get(i).copied().unwrap_or(0);
            let bn = b.get(i).copied().unwrap_or(0);
            match an.cmp(&bn) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
