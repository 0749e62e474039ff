use super::*;

const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
<channel>
<title>Macro Alerts</title>
<item>
<title>Fed holds rates steady</title>
<link>https://example.com/articles/fed-holds</link>
<pubDate>Mon, 01 Jan 2024 12:00:00 GMT</pubDate>
</item>
<item>
<title>Untitled item still needs a link</title>
<link>https://example.com/articles/no-date</link>
</item>
<item>
<title>Missing link is dropped</title>
</item>
</channel>
</rss>"#;

#[test]
fn extracts_title_link_and_published_date() {
    let channel: rss::Channel = SAMPLE_FEED.parse().unwrap();
    let entries = entries_from_channel(&channel);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].title, "Fed holds rates steady");
    assert_eq!(entries[0].url, "https://example.com/articles/fed-holds");
    assert!(entries[0].published.is_some());
}

#[test]
fn entry_without_published_date_is_kept_with_none() {
    let channel: rss::Channel = SAMPLE_FEED.parse().unwrap();
    let entries = entries_from_channel(&channel);
    assert_eq!(entries[1].published, None);
}

#[test]
fn entry_missing_a_link_is_dropped() {
    let channel: rss::Channel = SAMPLE_FEED.parse().unwrap();
    let entries = entries_from_channel(&channel);
    assert!(entries.iter().all(|e| e.title != "Missing link is dropped"));
}
