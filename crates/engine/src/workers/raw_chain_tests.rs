use super::*;
use chainfeed_bus::FakeBus;
use chainfeed_core::{ContractType, FakeClock, WorkerState};
use chainfeed_providers::FakeChainProvider;

fn polygon_payload() -> serde_json::Value {
    serde_json::json!({
        "results": [
            {
                "details": {"contract_type": "call", "strike_price": 100.0, "expiration_date": "2026-12-18"},
                "last_quote": {"bid": 1.0, "ask": 1.2},
                "greeks": {"delta": 0.5, "gamma": 0.01, "theta": -0.02, "vega": 0.1},
                "open_interest": 500,
                "day": {"volume": 10}
            }
        ]
    })
}

#[tokio::test]
async fn run_cycle_writes_a_normalized_chain_frame() {
    let bus = Arc::new(FakeBus::new());
    let provider: Arc<dyn ChainProvider> = Arc::new(FakeChainProvider::new("polygon", polygon_payload()));
    let worker = RawChainWorker::new("SPX", provider, bus.clone(), FakeClock::new(), 30, 20);
    let mut failures = ConsecutiveFailures::new();

    worker.run_cycle(&mut failures).await;

    let raw = bus.get(&keys::chain_raw("SPX")).await.unwrap().expect("chain frame should be written");
    let feed: ChainFeed = serde_json::from_str(&raw).unwrap();
    assert_eq!(feed.symbol, "SPX");
    assert_eq!(feed.count, 1);
    assert_eq!(feed.contracts[0].contract_type, ContractType::Call);
    assert_eq!(feed.contracts[0].strike, 100.0);
}

#[tokio::test]
async fn three_consecutive_failures_marks_the_symbol_degraded() {
    let bus = Arc::new(FakeBus::new());
    let provider: Arc<dyn ChainProvider> = Arc::new(FakeChainProvider::failing("polygon", "vendor down"));
    let worker = RawChainWorker::new("SPX", provider, bus.clone(), FakeClock::new(), 30, 20);
    let mut failures = ConsecutiveFailures::new();

    worker.run_cycle(&mut failures).await;
    worker.run_cycle(&mut failures).await;
    assert!(bus.get(&keys::feed_validation("SPX")).await.unwrap().is_none());

    worker.run_cycle(&mut failures).await;
    let raw = bus.get(&keys::feed_validation("SPX")).await.unwrap().expect("degraded status should be written on the third failure");
    let status: WorkerStatus = serde_json::from_str(&raw).unwrap();
    assert_eq!(status.state, WorkerState::Degraded);
}

#[tokio::test]
async fn recovers_to_active_after_a_degraded_run() {
    let bus = Arc::new(FakeBus::new());
    let failing: Arc<dyn ChainProvider> = Arc::new(FakeChainProvider::failing("polygon", "vendor down"));
    let worker = RawChainWorker::new("SPX", failing, bus.clone(), FakeClock::new(), 30, 20);
    let mut failures = ConsecutiveFailures::new();

    worker.run_cycle(&mut failures).await;
    worker.run_cycle(&mut failures).await;
    worker.run_cycle(&mut failures).await;
    let raw = bus.get(&keys::feed_validation("SPX")).await.unwrap().expect("degraded status should be written");
    let status: WorkerStatus = serde_json::from_str(&raw).unwrap();
    assert_eq!(status.state, WorkerState::Degraded);

    let recovered: Arc<dyn ChainProvider> = Arc::new(FakeChainProvider::new("polygon", polygon_payload()));
    let worker = RawChainWorker::new("SPX", recovered, bus.clone(), FakeClock::new(), 30, 20);
    worker.run_cycle(&mut failures).await;

    let raw = bus.get(&keys::feed_validation("SPX")).await.unwrap().expect("active status should be re-published on recovery");
    let status: WorkerStatus = serde_json::from_str(&raw).unwrap();
    assert_eq!(status.state, WorkerState::Active);
    assert_eq!(status.item_count, 1);
}
