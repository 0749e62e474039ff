use super::*;

#[test]
fn persistent_prefixes() {
    assert_eq!(ttl_for_key("meta:anything"), Ttl::Persistent);
    assert_eq!(ttl_for_key("config:anything"), Ttl::Persistent);
    assert_eq!(ttl_for_key("expirations:anything"), Ttl::Persistent);
}

#[test]
fn mesh_prefix_is_600s() {
    assert_eq!(ttl_for_key("mesh:state"), Ttl::seconds(600));
}

#[test]
fn heartbeat_prefix_is_15s_default() {
    assert_eq!(ttl_for_key("heartbeat:default"), Ttl::seconds(HEARTBEAT_TTL_SECS));
}

#[test]
fn chainfeed_prefix_is_20s() {
    assert_eq!(ttl_for_key("chainfeed:SPX"), Ttl::seconds(20));
}

#[test]
fn feed_prefix_is_15s() {
    assert_eq!(ttl_for_key("feed:rss"), Ttl::seconds(15));
}

#[test]
fn unmatched_prefix_gets_default() {
    assert_eq!(ttl_for_key("truth:chain:raw:SPX"), Ttl::seconds(DEFAULT_TTL_SECS));
    assert_eq!(ttl_for_key("anything:else"), Ttl::seconds(DEFAULT_TTL_SECS));
}

#[test]
fn as_secs() {
    assert_eq!(Ttl::Persistent.as_secs(), None);
    assert_eq!(Ttl::seconds(20).as_secs(), Some(20));
}
