use super::*;
use chainfeed_bus::FakeBus;
use chainfeed_core::{keys, Truth, Version};
use std::sync::Arc;

fn bus() -> Arc<FakeBus> {
    Arc::new(FakeBus::new())
}

#[tokio::test]
async fn sync_with_bus_publishes_local_copy_when_bus_is_empty() {
    let bus = bus();
    let service = TruthService::new(Truth::seed(), bus.clone());
    service.sync_with_bus().await.unwrap();

    let raw = bus.get(keys::TRUTH_SCHEMA).await.unwrap().unwrap();
    let stored: Truth = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored.version, Version::from("v1.0.0"));
}

#[tokio::test]
async fn sync_with_bus_adopts_newer_remote_copy() {
    let bus = bus();
    let mut remote = Truth::seed();
    remote.version = Version::from("v2.0.0");
    bus.set(keys::TRUTH_SCHEMA, serde_json::to_string(&remote).unwrap(), None).await.unwrap();

    let service = TruthService::new(Truth::seed(), bus);
    service.sync_with_bus().await.unwrap();

    assert_eq!(service.get().version, Version::from("v2.0.0"));
}

#[tokio::test]
async fn adopt_if_newer_rejects_older_or_equal_version() {
    let service = TruthService::new(Truth::seed(), bus());
    let mut older = Truth::seed();
    older.version = Version::from("v0.9.0");
    assert!(!service.adopt_if_newer(older));
    assert_eq!(service.get().version, Version::from("v1.0.0"));

    let same = Truth::seed();
    assert!(!service.adopt_if_newer(same));
}

#[tokio::test]
async fn publish_update_bumps_patch_and_stamps_last_updated() {
    let bus = bus();
    let service = TruthService::new(Truth::seed(), bus.clone());
    let snapshot = service
        .publish_update(|truth| {
            truth.chainfeed.default_symbols.push("SPX".into());
        })
        .await
        .unwrap();

    assert_eq!(snapshot.version, Version::from("v1.0.1"));
    assert!(snapshot.metadata.last_updated.is_some());
    assert_eq!(snapshot.chainfeed.default_symbols, vec!["SPX".to_string()]);

    let raw = bus.get(keys::TRUTH_SCHEMA).await.unwrap().unwrap();
    let stored: Truth = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored.version, Version::from("v1.0.1"));
}

#[tokio::test]
async fn concurrent_publish_updates_never_collide_on_a_version() {
    let bus = bus();
    let service = TruthService::new(Truth::seed(), bus.clone());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .publish_update(|truth| {
                        truth.chainfeed.default_symbols.push(format!("SYM{i}"));
                    })
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut versions = Vec::new();
    for handle in handles {
        versions.push(handle.await.unwrap().version.clone());
    }

    let mut unique = versions.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), versions.len(), "every concurrent update must land on a distinct version: {versions:?}");

    // Every symbol pushed by every concurrent updater must survive in the
    // final document — a lost update would drop one.
    let final_symbols = &service.get().chainfeed.default_symbols;
    assert_eq!(final_symbols.len(), 8);
}

#[tokio::test]
async fn subscribe_adopts_newer_truth_published_on_channel() {
    let bus = bus();
    let service = TruthService::new(Truth::seed(), bus.clone());
    let cancel = tokio_util::sync::CancellationToken::new();
    let handle = service.subscribe(cancel.clone());

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let mut newer = Truth::seed();
    newer.version = Version::from("v1.5.0");
    bus.publish(keys::CHANNEL_TRUTH_UPDATE, serde_json::to_string(&newer).unwrap()).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert_eq!(service.get().version, Version::from("v1.5.0"));

    cancel.cancel();
    handle.await.unwrap();
}

#[test]
fn is_strictly_newer_matches_version_ordering() {
    assert!(is_strictly_newer(&Version::from("v1.0.1"), &Version::from("v1.0.0")));
    assert!(!is_strictly_newer(&Version::from("v1.0.0"), &Version::from("v1.0.0")));
    assert!(!is_strictly_newer(&Version::from("v1.0.0"), &Version::from("v1.0.1")));
}
