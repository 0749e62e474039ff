// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized bus key and channel strings. Every caller builds a key
//! through one of these functions or constants — never by ad-hoc
//! `format!` elsewhere — so the wire contract with downstream consumers
//! lives in one place.

/// JSON truth document. Writer: Truth Service. TTL: persistent.
pub const TRUTH_SCHEMA: &str = "truth:integration:schema";

/// `{phase, status{...}, timestamp}`. Writer: Startup. TTL: persistent.
pub const STARTUP_STATUS: &str = "truth:system:startup_status";

/// One-shot shutdown announce. Writer: Startup. TTL: persistent.
pub const SHUTDOWN_NOTICE: &str = "truth:system:shutdown_notice";

/// `mesh:state` hash, field `{node}:{group}` → payload. TTL: persistent.
pub const MESH_STATE: &str = "mesh:state";

/// Truth version bumps channel.
pub const CHANNEL_TRUTH_UPDATE: &str = "truth:update:schema";

/// Each heartbeat emission channel.
pub const CHANNEL_MESH_UPDATE: &str = "mesh:update";

/// Shutdown notices, stale-heartbeat alerts channel.
pub const CHANNEL_SYSTEM_ALERT: &str = "truth:alert:system";

/// Registry of active feed groups. Writer: Feed Orchestrator. TTL: persistent.
pub const FEED_REGISTRY: &str = "truth:feed:registry";

pub fn heartbeat_by_node(node_id: &str) -> String {
    format!("truth:heartbeat:{node_id}")
}

pub fn heartbeat_by_group(group: &str) -> String {
    format!("heartbeat:{group}")
}

pub fn chain_raw(symbol: &str) -> String {
    format!("truth:chain:raw:{symbol}")
}

pub fn chain_full(symbol: &str) -> String {
    format!("truth:chain:full:{symbol}")
}

pub fn chain_full_prev(symbol: &str) -> String {
    format!("truth:chain:full:{symbol}:prev")
}

pub fn chain_diff(symbol: &str) -> String {
    format!("truth:chain:diff:{symbol}")
}

pub fn synthetic_spot(synth: &str) -> String {
    format!("truth:spot:{synth}")
}

pub fn rss_entry(group: &str, uid: &str) -> String {
    format!("truth:feed:rss:{group}:{uid}")
}

pub fn rss_metrics(group: &str) -> String {
    format!("truth:feed:rss:metrics:{group}")
}

pub fn feed_validation(symbol: &str) -> String {
    format!("truth:feed:{symbol}:validation")
}

pub fn provider_metadata(name: &str) -> String {
    format!("truth:provider:{name}:metadata")
}

/// Per-symbol expiration window summary. Writer: Diff Transform Worker.
/// TTL: persistent (see `expirations:` in the TTL policy table).
pub fn expirations(symbol: &str) -> String {
    format!("expirations:{symbol}")
}

/// Optional identity/role assignment record, written by the startup
/// orchestrator's `entity_bridge_initialized` phase. Not part of spec.md's
/// bit-exact table (entity records are additive, node-local bookkeeping),
/// so the key shape is ours to pick.
pub fn entity_record(id: &str) -> String {
    format!("truth:entity:{id}:assignment")
}

#[cfg(test)]
#[path = "keys_tests.rs"]
mod tests;
