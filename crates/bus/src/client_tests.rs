use super::*;
use crate::fake::FakeBus;

#[tokio::test]
async fn default_ttl_policy_defers_to_the_prefix_table() {
    let bus = FakeBus::new();
    assert_eq!(bus.ttl_policy("mesh:state"), Ttl::seconds(600));
    assert_eq!(bus.ttl_policy("unmatched:key"), Ttl::seconds(crate::ttl::DEFAULT_TTL_SECS));
}

#[tokio::test]
async fn get_set_round_trip() {
    let bus = FakeBus::new();
    assert_eq!(bus.get("k").await.unwrap(), None);
    bus.set("k", "v".into(), None).await.unwrap();
    assert_eq!(bus.get("k").await.unwrap(), Some("v".into()));
}
