use super::*;

#[test]
fn exact_match_without_wildcard() {
    assert!(matches("heartbeat:default", "heartbeat:default"));
    assert!(!matches("heartbeat:default", "heartbeat:other"));
}

#[test]
fn trailing_wildcard() {
    assert!(matches("heartbeat:*", "heartbeat:default"));
    assert!(matches("heartbeat:*", "heartbeat:"));
    assert!(!matches("heartbeat:*", "other:default"));
}

#[test]
fn leading_wildcard() {
    assert!(matches("*:default", "heartbeat:default"));
    assert!(!matches("*:default", "heartbeat:other"));
}

#[test]
fn wildcard_in_middle() {
    assert!(matches("truth:chain:*:SPX", "truth:chain:raw:SPX"));
    assert!(!matches("truth:chain:*:SPX", "truth:chain:raw:NDX"));
}

#[test]
fn bare_wildcard_matches_everything() {
    assert!(matches("*", "anything"));
    assert!(matches("*", ""));
}
