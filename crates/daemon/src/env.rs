// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the startup orchestrator —
//! every variable spec.md §6 recognizes, read in exactly one place with a
//! typed accessor and a documented fallback.

use std::path::PathBuf;
use std::time::Duration;

/// `REDIS_HOST` / `REDIS_PORT` composed into a `redis://` URL, defaulting
/// to a local instance so a node is runnable with no configuration beyond
/// a seed truth document.
pub fn redis_url() -> String {
    let host = std::env::var("REDIS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
    format!("redis://{host}:{port}")
}

/// `POLYGON_API_KEY`, consulted only as a fallback when a provider's truth
/// config names `api_key_env` pointing at it; providers otherwise resolve
/// their own key via `DataProviderConfig::resolve_api_key`.
pub fn polygon_api_key() -> Option<String> {
    std::env::var("POLYGON_API_KEY").ok().filter(|s| !s.is_empty())
}

/// `POLYGON_BASE_URL`, used when a provider's truth config omits
/// `base_url` entirely (malformed truth, not expected in practice — the
/// truth document is the source of truth for base URLs).
pub fn polygon_base_url() -> String {
    std::env::var("POLYGON_BASE_URL").unwrap_or_else(|_| "https://api.polygon.io".to_string())
}

/// `SHUTDOWN_GRACE_DELAY` (seconds), the pause between stopping the
/// ingestion workers and stopping the heartbeat/truth listener, so mesh
/// observers see the transitional `shutting_down` state (spec.md §4.7).
pub fn shutdown_grace_delay() -> Duration {
    std::env::var("SHUTDOWN_GRACE_DELAY")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(5))
}

/// Directory the daemon's rolling log file is written under:
/// `XDG_STATE_HOME/chainfeed` or `~/.local/state/chainfeed`, matching the
/// teacher's own `dirs::state_dir()` resolution chain.
pub fn log_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local/state")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chainfeed")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
