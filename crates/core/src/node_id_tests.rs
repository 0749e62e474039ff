// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::truth::Truth;
use serial_test::serial;

#[test]
#[serial]
fn resolve_prefers_node_id_env_var() {
    std::env::remove_var("HOSTNAME");
    std::env::set_var("NODE_ID", "node-from-env");
    let mut truth = Truth::seed();
    truth.mesh.node_id = Some("node-from-truth".into());
    assert_eq!(NodeId::resolve(&truth).as_str(), "node-from-env");
    std::env::remove_var("NODE_ID");
}

#[test]
#[serial]
fn resolve_falls_back_to_truth_node_id() {
    std::env::remove_var("NODE_ID");
    std::env::remove_var("HOSTNAME");
    let mut truth = Truth::seed();
    truth.mesh.node_id = Some("node-from-truth".into());
    assert_eq!(NodeId::resolve(&truth).as_str(), "node-from-truth");
}

#[test]
#[serial]
fn resolve_falls_back_to_hostname() {
    std::env::remove_var("NODE_ID");
    std::env::set_var("HOSTNAME", "box-7");
    let truth = Truth::seed();
    assert_eq!(NodeId::resolve(&truth).as_str(), "box-7");
    std::env::remove_var("HOSTNAME");
}

#[test]
#[serial]
fn resolve_generates_a_random_id_as_last_resort() {
    std::env::remove_var("NODE_ID");
    std::env::remove_var("HOSTNAME");
    let truth = Truth::seed();
    let resolved = NodeId::resolve(&truth);
    assert!(resolved.as_str().starts_with("node-"));
}
