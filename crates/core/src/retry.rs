// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capped exponential backoff shared by the bus client and the HTTP fetch
//! path.

use std::future::Future;
use std::time::Duration;

/// Delays between attempts, in order. Four attempts total: three retries
/// after the first failure.
pub const BACKOFF_SCHEDULE_MS: [u64; 3] = [100, 400, 1600];

/// Whether an error should be retried at all. Transient failures are;
/// malformed payloads and configuration errors are not.
pub trait Retryable {
    fn is_transient(&self) -> bool;
}

/// Run `attempt` up to `BACKOFF_SCHEDULE_MS.len() + 1` times, sleeping the
/// capped exponential schedule between retryable failures. Returns the
/// last error if every attempt fails, or immediately on a non-transient
/// error.
pub async fn retry_with_backoff<T, E, F, Fut>(mut attempt: F) -> Result<T, E>
where
    E: Retryable,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut result = attempt().await;
    for delay_ms in BACKOFF_SCHEDULE_MS {
        let transient = match &result {
            Ok(_) => return result,
            Err(err) => err.is_transient(),
        };
        if !transient {
            return result;
        }
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        result = attempt().await;
    }
    result
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
