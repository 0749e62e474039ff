// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chainfeed-core: canonical data model shared by every ChainFeed node
//! component — the canonical truth document, option-chain/diff types,
//! heartbeat/mesh types, worker status, identifiers, the clock
//! abstraction, and the capped-backoff retry helper.

pub mod macros;

pub mod chainfeed;
pub mod clock;
pub mod contract;
pub mod diff;
pub mod heartbeat;
pub mod id;
pub mod keys;
pub mod node_id;
pub mod retry;
pub mod truth;
pub mod version;
pub mod worker_status;

pub use chainfeed::ChainFeed;
pub use clock::{Clock, FakeClock, SystemClock};
pub use contract::{ContractKey, ContractType, OptionContract};
pub use diff::{apply_diff, compute_diff, ContractChange, DiffFrame, FieldChange};
pub use heartbeat::{HeartbeatPayload, HeartbeatStatus, MeshEntry};
pub use id::short;
pub use node_id::{Group, NodeId, Symbol};
pub use retry::{retry_with_backoff, Retryable, BACKOFF_SCHEDULE_MS};
pub use truth::{
    ChainfeedConfig, DataProviderConfig, EntityRecord, FeedScope, MeshConfig, ProvidersConfig,
    RawConfig, RssGroupConfig, RssSourceConfig, SyntheticComponent, SyntheticIndex, Truth,
    TruthMetadata,
};
pub use version::Version;
pub use worker_status::{ConsecutiveFailures, WorkerState, WorkerStatus};
