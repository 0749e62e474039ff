// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

crate::define_string_id! {
    /// Test identifier type for macro verification.
    pub struct TestId;
}

#[test]
fn string_id_hash_map_lookup() {
    let mut map = HashMap::new();
    map.insert(TestId::new("k"), 42);
    assert_eq!(map.get("k"), Some(&42));
}

#[test]
fn string_id_equals_str() {
    let id = TestId::new("spx_complex");
    assert_eq!(id, "spx_complex");
    assert_eq!(id, *"spx_complex");
}

#[test]
fn string_id_display_and_from() {
    let id: TestId = "foo".into();
    assert_eq!(id.to_string(), "foo");
    assert_eq!(id.as_str(), "foo");
}

#[test]
fn string_id_ordered() {
    let mut ids = vec![TestId::new("b"), TestId::new("a"), TestId::new("c")];
    ids.sort();
    assert_eq!(ids, vec![TestId::new("a"), TestId::new("b"), TestId::new("c")]);
}

#[test]
fn short_truncates() {
    let s = "abcdefghijklmnop";
    assert_eq!(short(s, 8), "abcdefgh");
    assert_eq!(short(s, 100), s);
    assert_eq!(short("abc", 8), "abc");
}
