// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node, group, and symbol identifiers.

use crate::truth::Truth;

crate::define_string_id! {
    /// Process-wide identity of this node, resolved once at startup and
    /// passed by value into every component.
    pub struct NodeId;
}

crate::define_string_id! {
    /// A named set of correlated symbols a node participates in
    /// (e.g. `spx_complex`).
    pub struct Group;
}

crate::define_string_id! {
    /// An underlying option-chain symbol (e.g. `SPX`).
    pub struct Symbol;
}

impl NodeId {
    /// Resolve this node's identity: `NODE_ID` env var, then
    /// `mesh.node_id` from the canonical truth, then a random fallback.
    ///
    /// The fallback keeps a node usable even when neither an operator nor
    /// the truth document assigned it a stable name; it will simply appear
    /// under a new identity on every restart.
    pub fn resolve(truth: &Truth) -> Self {
        if let Ok(id) = std::env::var("NODE_ID") {
            if !id.is_empty() {
                return NodeId::new(id);
            }
        }
        if let Some(id) = &truth.mesh.node_id {
            if !id.is_empty() {
                return NodeId::new(id.clone());
            }
        }
        if let Ok(host) = std::env::var("HOSTNAME") {
            if !host.is_empty() {
                return NodeId::new(host);
            }
        }
        NodeId::new(format!("node-{}", uuid::Uuid::new_v4()))
    }
}

#[cfg(test)]
#[path = "node_id_tests.rs"]
mod tests;
