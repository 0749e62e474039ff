// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn equal_versions_compare_equal() {
    assert_eq!(Version::new("v1.0.0"), Version::new("v1.0.0"));
    assert_eq!(Version::new("v1.0.0").cmp(&Version::new("v1.0.0")), Ordering::Equal);
}

#[test]
fn patch_ordering() {
    assert!(Version::new("v1.0.1") > Version::new("v1.0.0"));
    assert!(Version::new("v1.0.0") < Version::new("v1.0.1"));
}

#[test]
fn minor_beats_patch() {
    assert!(Version::new("v1.1.0") > Version::new("v1.0.9"));
}

#[test]
fn major_beats_minor_and_patch() {
    assert!(Version::new("v2.0.0") > Version::new("v1.9.9"));
}

#[test]
fn missing_trailing_components_pad_with_zero() {
    assert_eq!(Version::new("v1.4").cmp(&Version::new("v1.4.0")), Ordering::Equal);
    assert!(Version::new("v1.4.1") > Version::new("v1.4"));
}

#[test]
fn leading_v_is_optional() {
    assert_eq!(Version::new("1.4.2").cmp(&Version::new("v1.4.2")), Ordering::Equal);
}

#[test]
fn non_numeric_component_parses_as_zero() {
    assert_eq!(Version::new("v1.x.0").cmp(&Version::new("v1.0.0")), Ordering::Equal);
}

#[test]
fn bump_patch_increments_third_component() {
    assert_eq!(Version::new("v1.4.2").bump_patch(), Version::new("v1.4.3"));
}

#[test]
fn bump_patch_pads_missing_components() {
    assert_eq!(Version::new("v1").bump_patch(), Version::new("v1.0.1"));
    assert_eq!(Version::new("v1.4").bump_patch(), Version::new("v1.4.1"));
}

#[test]
fn bump_patch_preserves_no_v_prefix() {
    assert_eq!(Version::new("1.0.0").bump_patch(), Version::new("1.0.1"));
}

#[test]
fn total_order_sorts_a_shuffled_sequence() {
    let mut versions = vec![
        Version::new("v2.0.0"),
        Version::new("v1.0.0"),
        Version::new("v1.10.0"),
        Version::new("v1.2.0"),
        Version::new("v1.0.5"),
    ];
    versions.sort();
    assert_eq!(
        versions,
        vec![
            Version::new("v1.0.0"),
            Version::new("v1.0.5"),
            Version::new("v1.2.0"),
            Version::new("v1.10.0"),
            Version::new("v2.0.0"),
        ]
    );
}
