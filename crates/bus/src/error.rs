// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus error taxonomy: transient I/O vs. malformed payload.

use chainfeed_core::Retryable;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    /// Connection loss, timeout, or a backend that refused the op. Callers
    /// retry with capped exponential backoff.
    #[error("transient bus error: {0}")]
    Transient(String),

    /// Bytes came back but failed to decode as UTF-8 or JSON. Never
    /// retried — dropped and counted by the caller.
    #[error("malformed bus payload: {0}")]
    Malformed(String),
}

impl Retryable for BusError {
    fn is_transient(&self) -> bool {
        matches!(self, BusError::Transient(_))
    }
}

impl From<redis::RedisError> for BusError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error() || err.is_timeout() || err.is_connection_dropped() || err.is_connection_refusal() {
            BusError::Transient(err.to_string())
        } else {
            BusError::Malformed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BusError {
    fn from(err: serde_json::Error) -> Self {
        BusError::Malformed(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
