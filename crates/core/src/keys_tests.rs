// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn bit_exact_key_schema() {
    assert_eq!(TRUTH_SCHEMA, "truth:integration:schema");
    assert_eq!(STARTUP_STATUS, "truth:system:startup_status");
    assert_eq!(SHUTDOWN_NOTICE, "truth:system:shutdown_notice");
    assert_eq!(MESH_STATE, "mesh:state");
    assert_eq!(CHANNEL_TRUTH_UPDATE, "truth:update:schema");
    assert_eq!(CHANNEL_MESH_UPDATE, "mesh:update");
    assert_eq!(CHANNEL_SYSTEM_ALERT, "truth:alert:system");
    assert_eq!(FEED_REGISTRY, "truth:feed:registry");
}

#[test]
fn formatted_keys_match_the_schema() {
    assert_eq!(heartbeat_by_node("node-a"), "truth:heartbeat:node-a");
    assert_eq!(heartbeat_by_group("default"), "heartbeat:default");
    assert_eq!(chain_raw("SPX"), "truth:chain:raw:SPX");
    assert_eq!(chain_full("SPX"), "truth:chain:full:SPX");
    assert_eq!(chain_full_prev("SPX"), "truth:chain:full:SPX:prev");
    assert_eq!(chain_diff("SPX"), "truth:chain:diff:SPX");
    assert_eq!(synthetic_spot("SPXW"), "truth:spot:SPXW");
    assert_eq!(rss_entry("macro", "abc123"), "truth:feed:rss:macro:abc123");
    assert_eq!(rss_metrics("macro"), "truth:feed:rss:metrics:macro");
    assert_eq!(feed_validation("SPX"), "truth:feed:SPX:validation");
    assert_eq!(provider_metadata("polygon"), "truth:provider:polygon:metadata");
    assert_eq!(entity_record("seat-1"), "truth:entity:seat-1:assignment");
    assert_eq!(expirations("SPX"), "expirations:SPX");
}
