use super::*;

use chainfeed_bus::FakeBus;
use chainfeed_core::{keys, FakeClock, Truth};
use chainfeed_providers::FakeRssSource;

fn seed_truth(node_id: &str) -> Truth {
    let mut truth = Truth::seed();
    truth.mesh.node_id = Some(node_id.to_string());
    truth
}

#[tokio::test]
async fn startup_with_empty_config_reaches_startup_complete() {
    let bus = Arc::new(FakeBus::new());
    let clock = FakeClock::new();
    let rss_source = Arc::new(FakeRssSource::new());
    let config = Config { seed_path_override: None };

    // No local seed file and nothing on the bus yet means the resolver has
    // nothing to fall back to, so seed it directly via the bus to exercise
    // the "adopt what's already there" path instead.
    let seeded = seed_truth("node-a");
    bus.set(keys::TRUTH_SCHEMA, serde_json::to_string(&seeded).unwrap(), None).await.unwrap();

    let node = startup(bus.clone(), clock, rss_source, config).await.expect("startup should succeed");

    assert_eq!(node.node_id.as_str(), "node-a");
    assert!(node.phases.all_healthy());
    assert!(bus.contains(keys::STARTUP_STATUS));

    node.truth_listener_cancel.cancel();
    node.heartbeat_emitter_cancel.cancel();
    node.heartbeat_watcher_cancel.cancel();
    let _ = node.truth_listener.await;
    let _ = node.heartbeat_emitter_join.await;
    let _ = node.heartbeat_watcher_join.await;
    node.orchestrator.stop().await;
}

#[tokio::test]
async fn startup_fails_when_no_seed_is_available_anywhere() {
    let bus = Arc::new(FakeBus::new());
    let clock = FakeClock::new();
    let rss_source = Arc::new(FakeRssSource::new());
    let config = Config { seed_path_override: Some(std::path::PathBuf::from("/nonexistent/seed.json")) };

    let result = startup(bus, clock, rss_source, config).await;
    assert!(matches!(result, Err(LifecycleError::NoTruthAvailable)));
}

#[tokio::test]
async fn startup_publishes_entity_records_for_every_entity() {
    let bus = Arc::new(FakeBus::new());
    let clock = FakeClock::new();
    let rss_source = Arc::new(FakeRssSource::new());

    let mut seeded = seed_truth("node-b");
    seeded.entities.push(chainfeed_core::EntityRecord {
        id: "seat-1".to_string(),
        role: Some("primary".to_string()),
        symbols: vec!["SPY".to_string()],
    });
    bus.set(keys::TRUTH_SCHEMA, serde_json::to_string(&seeded).unwrap(), None).await.unwrap();

    let node = startup(bus.clone(), clock, rss_source, Config::default()).await.expect("startup should succeed");

    assert!(bus.contains(&keys::entity_record("seat-1")));
    assert_eq!(node.phases.snapshot().get("entity_bridge"), Some(&ComponentStatus::Ok));

    node.truth_listener_cancel.cancel();
    node.heartbeat_emitter_cancel.cancel();
    node.heartbeat_watcher_cancel.cancel();
    let _ = node.truth_listener.await;
    let _ = node.heartbeat_emitter_join.await;
    let _ = node.heartbeat_watcher_join.await;
    node.orchestrator.stop().await;
}

#[test]
fn build_provider_table_skips_disabled_providers() {
    let mut truth = Truth::seed();
    truth.providers.data_providers.insert(
        "polygon".to_string(),
        chainfeed_core::DataProviderConfig {
            enabled: false,
            api_key: Some("x".to_string()),
            api_key_env: None,
            base_url: "https://example.invalid".to_string(),
        },
    );
    let table = build_provider_table(&truth);
    assert!(table.is_empty());
}

#[test]
fn build_provider_table_includes_enabled_providers() {
    let mut truth = Truth::seed();
    truth.providers.data_providers.insert(
        "polygon".to_string(),
        chainfeed_core::DataProviderConfig {
            enabled: true,
            api_key: Some("x".to_string()),
            api_key_env: None,
            base_url: "https://example.invalid".to_string(),
        },
    );
    let table = build_provider_table(&truth);
    assert_eq!(table.len(), 1);
    assert!(table.contains_key("polygon"));
}
