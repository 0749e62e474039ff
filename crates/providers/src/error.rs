// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provider/normalizer error taxonomy.

use chainfeed_core::Retryable;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP 5xx, socket reset, timeout. Retried by the caller's worker loop
    /// via [`chainfeed_core::retry_with_backoff`].
    #[error("transient provider error: {0}")]
    Transient(String),

    /// Unparseable vendor payload or feed XML. Dropped and counted, never
    /// retried.
    #[error("malformed provider payload: {0}")]
    Malformed(String),

    /// A required configuration value (API key, base URL) was missing.
    #[error("provider misconfigured: {0}")]
    Configuration(String),
}

impl Retryable for ProviderError {
    fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Transient(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.status().is_some_and(|s| s.is_server_error()) {
            ProviderError::Transient(err.to_string())
        } else {
            ProviderError::Malformed(err.to_string())
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
