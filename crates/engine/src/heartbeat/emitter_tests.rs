use super::*;
use chainfeed_bus::FakeBus;
use chainfeed_core::{FakeClock, Truth};

use crate::truth::TruthService;

fn emitter(bus: Arc<FakeBus>) -> HeartbeatEmitter<FakeBus, FakeClock> {
    let truth = TruthService::new(Truth::seed(), bus.clone());
    HeartbeatEmitter::new(NodeId::new("node-a"), truth, bus, FakeClock::new())
}

#[tokio::test]
async fn emit_cycle_writes_under_the_implicit_default_group_when_unconfigured() {
    let bus = Arc::new(FakeBus::new());
    let emitter = emitter(bus.clone());

    emitter.emit_cycle(&Truth::seed()).await;

    let raw = bus.get(&keys::heartbeat_by_group("default")).await.unwrap().expect("heartbeat should be written under the default group");
    let payload: HeartbeatPayload = serde_json::from_str(&raw).unwrap();
    assert_eq!(payload.status, HeartbeatStatus::Online);

    let mesh = bus.hgetall(keys::MESH_STATE).await.unwrap();
    assert_eq!(mesh.len(), 1);
}

#[tokio::test]
async fn emit_shutdown_announces_shutting_down_and_a_shutdown_notice() {
    let bus = Arc::new(FakeBus::new());
    let emitter = emitter(bus.clone());

    emitter.emit_shutdown(&Truth::seed()).await;

    let raw = bus.get(&keys::heartbeat_by_group("default")).await.unwrap().unwrap();
    let payload: HeartbeatPayload = serde_json::from_str(&raw).unwrap();
    assert_eq!(payload.status, HeartbeatStatus::ShuttingDown);

    assert!(bus.get(keys::SHUTDOWN_NOTICE).await.unwrap().is_some());
}

#[tokio::test]
async fn emit_cycle_writes_one_entry_per_configured_group() {
    let bus = Arc::new(FakeBus::new());
    let emitter = emitter(bus.clone());
    let mut truth = Truth::seed();
    truth.chainfeed.feed_scope.insert("spx_complex".to_string(), chainfeed_core::FeedScope { update_interval_sec: 5 });
    truth.chainfeed.feed_scope.insert("ndx_complex".to_string(), chainfeed_core::FeedScope { update_interval_sec: 5 });

    emitter.emit_cycle(&truth).await;

    assert!(bus.get(&keys::heartbeat_by_group("spx_complex")).await.unwrap().is_some());
    assert!(bus.get(&keys::heartbeat_by_group("ndx_complex")).await.unwrap().is_some());
    let mesh = bus.hgetall(keys::MESH_STATE).await.unwrap();
    assert_eq!(mesh.len(), 2);
}
