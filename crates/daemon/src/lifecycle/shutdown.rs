// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Graceful shutdown: the five steps spec.md §4.7 specifies, in order,
//! with the configured grace delay between stopping the ingestion
//! workers and stopping the heartbeat/truth listener so mesh observers
//! see the transitional state.

use std::time::Duration;

use chainfeed_core::keys;
use tracing::{info, warn};

use super::{LifecycleError, StartedNode};

/// Tear a started node down in spec.md §4.7's order. Errors writing the
/// shutdown notice are logged and swallowed — a bus that's gone
/// unreachable during shutdown shouldn't prevent the process from
/// exiting cleanly.
pub async fn shutdown(node: StartedNode, grace_delay: Duration) {
    // Step 1: publish the shutdown notice.
    if let Err(err) = publish_shutdown_notice(&node).await {
        warn!(error = %err, "failed to publish shutdown notice");
    }

    // Step 2: write the final "shutting_down" heartbeat — cancelling the
    // emitter's token causes its own last cycle to do this (spec.md §4.3).
    node.heartbeat_emitter_cancel.cancel();
    let _ = node.heartbeat_emitter_join.await;

    // Step 3: stop RSS, diff, and chain workers (signal then join with
    // each worker's own grace period).
    node.orchestrator.stop().await;

    info!(grace_delay_secs = grace_delay.as_secs(), "holding transitional state before final teardown");
    tokio::time::sleep(grace_delay).await;

    // Step 4: stop the heartbeat watcher and the truth listener.
    node.heartbeat_watcher_cancel.cancel();
    let _ = node.heartbeat_watcher_join.await;
    node.truth_listener_cancel.cancel();
    let _ = node.truth_listener.await;

    // Step 5: close the bus client. Nothing in the `Bus` contract exposes
    // an explicit close — dropping the last `Arc<dyn Bus>` releases the
    // underlying connection, the same way the teacher's lock file is
    // released by `Drop` rather than an explicit call.
    drop(node.bus);

    info!("node shutdown complete");
}

async fn publish_shutdown_notice(node: &StartedNode) -> Result<(), LifecycleError> {
    let notice = serde_json::json!({ "node_id": node.node_id.as_str(), "timestamp": chrono::Utc::now() });
    let json = serde_json::to_string(&notice)?;
    node.bus.set(keys::SHUTDOWN_NOTICE, json.clone(), None).await?;
    node.bus.publish(keys::CHANNEL_SYSTEM_ALERT, format!("node {} shutting down", node.node_id)).await?;
    Ok(())
}

#[cfg(test)]
#[path = "shutdown_tests.rs"]
mod tests;
