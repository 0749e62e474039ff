// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Google Alerts redirect decoding: Google Alerts
//! wraps the real article URL in a `google.com/url?...&url=<encoded>` (or
//! `&q=<encoded>`) redirect link. The canonical URL used for UID hashing
//! and display must be the decoded target, not the redirect wrapper.

use url::Url;

/// Decode a Google Alerts redirect URL to its canonical target, or return
/// the input unchanged if it isn't a recognized redirect shape (a
/// non-Alerts source's URL, or a malformed redirect we can't parse).
pub fn canonical_url(raw_url: &str, is_google_alerts: bool) -> String {
    if !is_google_alerts {
        return raw_url.to_string();
    }
    let Ok(parsed) = Url::parse(raw_url) else {
        return raw_url.to_string();
    };
    for param in ["url", "q"] {
        if let Some((_, value)) = parsed.query_pairs().find(|(k, _)| k == param) {
            return value.into_owned();
        }
    }
    raw_url.to_string()
}

#[cfg(test)]
#[path = "google_alerts_tests.rs"]
mod tests;
