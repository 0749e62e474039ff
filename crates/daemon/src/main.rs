// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `chainfeedd`: runs one ChainFeed node. Connects to the bus, brings up
//! every component in the order `lifecycle::startup` specifies, then
//! blocks until a termination signal arrives and tears the node down.

use std::path::PathBuf;
use std::sync::Arc;

use chainfeed_bus::RedisBus;
use chainfeed_core::SystemClock;
use chainfeed_daemon::{env, lifecycle, Config};
use chainfeed_providers::HttpRssSource;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// `sysexits.h`'s `EX_CONFIG` — used for every unrecoverable startup
/// failure (bus unreachable, seed truth missing and bus also empty),
/// matching the teacher's convention of a distinct non-zero code per
/// failure class rather than a bare `exit(1)`.
const EXIT_CONFIG_ERROR: i32 = 78;

fn init_logging() {
    let log_dir = env::log_dir();
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "chainfeedd.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    // Leaked deliberately: the guard must outlive the process for buffered
    // log lines to flush, and this only runs once at process start.
    Box::leak(Box::new(guard));

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
}

/// Resolve the seed truth path override: the first CLI argument, if given
/// (spec.md §4.2: "Start(): load the local seed document from the first
/// of: a file path argument, ...").
fn seed_path_override() -> Option<PathBuf> {
    std::env::args().nth(1).map(PathBuf::from)
}

async fn wait_for_termination() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler, falling back to Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM"),
            _ = tokio::signal::ctrl_c() => info!("received SIGINT"),
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("received Ctrl+C");
    }
}

#[tokio::main]
async fn main() {
    init_logging();

    let bus = match RedisBus::connect(&env::redis_url()).await {
        Ok(bus) => Arc::new(bus),
        Err(err) => {
            error!(error = %err, "failed to connect to the bus, aborting startup");
            std::process::exit(EXIT_CONFIG_ERROR);
        }
    };

    let config = Config { seed_path_override: seed_path_override() };
    let rss_source = Arc::new(HttpRssSource::new());

    let node = match lifecycle::startup(bus, SystemClock, rss_source, config).await {
        Ok(node) => node,
        Err(err) => {
            error!(error = %err, "startup failed");
            std::process::exit(EXIT_CONFIG_ERROR);
        }
    };

    info!(node_id = %node.node_id, "node running, awaiting termination signal");
    wait_for_termination().await;

    lifecycle::shutdown(node, env::shutdown_grace_delay()).await;
    std::process::exit(0);
}
