// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Duration;

fn payload(status: HeartbeatStatus, ts: DateTime<Utc>) -> HeartbeatPayload {
    HeartbeatPayload {
        node_id: NodeId::new("node-a"),
        group: Group::new("default"),
        symbols: vec!["SPX".into()],
        timestamp: ts,
        status,
        version: Version::from("v1.0.0"),
    }
}

#[test]
fn mesh_field_combines_node_and_group() {
    let p = payload(HeartbeatStatus::Online, Utc::now());
    assert_eq!(p.mesh_field(), "node-a:default");
}

#[test]
fn fresh_heartbeat_is_not_stale() {
    let now = Utc::now();
    let p = payload(HeartbeatStatus::Online, now);
    assert!(!p.is_stale(now, Duration::seconds(30)));
}

#[test]
fn heartbeat_past_max_age_is_stale() {
    let now = Utc::now();
    let p = payload(HeartbeatStatus::Online, now - Duration::seconds(60));
    assert!(p.is_stale(now, Duration::seconds(30)));
}

#[test]
fn fresh_mesh_entry_has_no_offline_mark() {
    let entry = MeshEntry::fresh(payload(HeartbeatStatus::Online, Utc::now()));
    assert!(entry.marked_offline_at.is_none());
    assert_eq!(entry.key(), "node-a:default");
}

#[test]
fn heartbeat_status_roundtrips_snake_case() {
    let json = serde_json::to_value(HeartbeatStatus::ShuttingDown).unwrap();
    assert_eq!(json, "shutting_down");
}
