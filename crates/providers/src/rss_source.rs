// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The RSS fetcher contract — `fetch(url) -> Entries` — kept narrow and
//! adapter-shaped.

use crate::error::ProviderError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Default HTTP timeout for RSS fetches.
pub const RSS_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// One feed item, prior to UID computation or age filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RssEntry {
    pub title: String,
    /// The raw `<link>` as published — may be a Google Alerts redirect URL
    /// that still needs decoding.
    pub url: String,
    pub published: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait RssSource: Send + Sync + 'static {
    async fn fetch(&self, url: &str) -> Result<Vec<RssEntry>, ProviderError>;
}

/// `reqwest` + `rss` backed fetcher: downloads the feed body and parses it
/// as an RSS 2.0 channel.
pub struct HttpRssSource {
    client: reqwest::Client,
}

impl HttpRssSource {
    pub fn new() -> Self {
        let client = reqwest::Client::builder().timeout(RSS_FETCH_TIMEOUT).build().unwrap_or_default();
        Self { client }
    }
}

impl Default for HttpRssSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RssSource for HttpRssSource {
    async fn fetch(&self, url: &str) -> Result<Vec<RssEntry>, ProviderError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Transient(format!("RSS fetch of {url} returned HTTP {}", response.status())));
        }
        let bytes = response.bytes().await?;
        let channel = rss::Channel::read_from(&bytes[..])
            .map_err(|err| ProviderError::Malformed(format!("invalid RSS feed at {url}: {err}")))?;
        Ok(entries_from_channel(&channel))
    }
}

/// Pure extraction of [`RssEntry`] from a parsed channel — split out from
/// [`HttpRssSource::fetch`] so the mapping logic is testable without a
/// network round-trip.
pub fn entries_from_channel(channel: &rss::Channel) -> Vec<RssEntry> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = item.title()?.to_string();
            let link = item.link()?.to_string();
            let published = item
                .pub_date()
                .and_then(|s| DateTime::parse_from_rfc2822(s).ok())
                .map(|dt| dt.with_timezone(&Utc));
            Some(RssEntry { title, url: link, published })
        })
        .collect()
}

#[cfg(test)]
#[path = "rss_source_tests.rs"]
mod tests;
