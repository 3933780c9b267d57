//! Shared feed fetching and entry extraction helpers.
//!
//! All three collectors consume RSS/Atom documents. This module wraps the
//! HTTP fetch + `feed-rs` parse step and normalizes the per-entry fields the
//! collectors care about: title, link, summary text, and a best-effort
//! publish timestamp.

use chrono::{DateTime, Local};
use feed_rs::model::{Entry, Feed};
use std::error::Error;
use tracing::{debug, instrument};

/// Fetch a feed document over HTTP and parse it.
///
/// Any non-success status or parse failure surfaces as an error; callers
/// decide whether that fails a whole source or just one mirror attempt.
#[instrument(level = "debug", skip(client), fields(%url))]
pub async fn fetch_feed(client: &reqwest::Client, url: &str) -> Result<Feed, Box<dyn Error>> {
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.bytes().await?;
    let feed = feed_rs::parser::parse(body.as_ref())?;
    debug!(entries = feed.entries.len(), "Parsed feed");
    Ok(feed)
}

/// Entry title, or a placeholder when the feed omits one.
pub fn entry_title(entry: &Entry) -> String {
    entry
        .title
        .as_ref()
        .map(|t| t.content.clone())
        .unwrap_or_else(|| "No Title".to_string())
}

/// First link of the entry, if any. Entries without a link are skipped by
/// the collectors.
pub fn entry_link(entry: &Entry) -> Option<String> {
    entry.links.first().map(|l| l.href.clone())
}

/// Summary/description text: the summary field when present, otherwise the
/// entry body, otherwise empty.
pub fn entry_summary(entry: &Entry) -> String {
    if let Some(summary) = &entry.summary {
        summary.content.clone()
    } else if let Some(content) = &entry.content {
        content.body.clone().unwrap_or_default()
    } else {
        String::new()
    }
}

/// Best-effort publish time for an entry.
///
/// Ordered fallback chain: the structured publish timestamp, then the
/// entry's update timestamp (feed-rs has already applied lenient free-text
/// date parsing to both), then the collection wall-clock time.
pub fn entry_published(entry: &Entry, now: DateTime<Local>) -> DateTime<Local> {
    entry
        .published
        .or(entry.updated)
        .map(|dt| dt.with_timezone(&Local))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Local};

    const FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Fixture Feed</title>
    <link>https://example.com</link>
    <description>test feed</description>
    <item>
      <title>Dated entry</title>
      <link>https://example.com/dated</link>
      <description>has a pubDate</description>
      <pubDate>Tue, 01 Jul 2025 10:30:00 GMT</pubDate>
    </item>
    <item>
      <title>Undated entry</title>
      <link>https://example.com/undated</link>
      <description>no date at all</description>
    </item>
    <item>
      <description>no title, no link</description>
    </item>
  </channel>
</rss>"#;

    fn fixture() -> Feed {
        feed_rs::parser::parse(FIXTURE.as_bytes()).unwrap()
    }

    #[test]
    fn structured_date_is_used() {
        let feed = fixture();
        let now = Local::now();
        let published = entry_published(&feed.entries[0], now);
        assert_eq!(published.year(), 2025);
        assert_eq!(published.month(), 7);
        assert_eq!(published.day(), 1);
    }

    #[test]
    fn missing_date_falls_back_to_now() {
        let feed = fixture();
        let now = Local::now();
        let published = entry_published(&feed.entries[1], now);
        assert_eq!(published, now);
    }

    #[test]
    fn title_placeholder_when_missing() {
        let feed = fixture();
        assert_eq!(entry_title(&feed.entries[0]), "Dated entry");
        assert_eq!(entry_title(&feed.entries[2]), "No Title");
    }

    #[test]
    fn link_extraction() {
        let feed = fixture();
        assert_eq!(
            entry_link(&feed.entries[0]).as_deref(),
            Some("https://example.com/dated")
        );
        assert!(entry_link(&feed.entries[2]).is_none());
    }

    #[test]
    fn summary_extraction() {
        let feed = fixture();
        assert_eq!(entry_summary(&feed.entries[0]), "has a pubDate");
    }
}
