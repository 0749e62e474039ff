// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Emitter and watcher pair: periodic self-announce and peer liveness
//! scanning. Each runs as its own `tokio::task`, generic over [`Bus`] and
//! [`Clock`] so tests inject [`chainfeed_bus::FakeBus`] and
//! [`chainfeed_core::FakeClock`] instead of real I/O and wall time.

pub mod emitter;
pub mod watcher;

pub use emitter::HeartbeatEmitter;
pub use watcher::HeartbeatWatcher;
