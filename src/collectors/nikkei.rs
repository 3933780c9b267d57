//! Nikkei tech-section article collector.
//!
//! Fetches the Nikkei technology RSS feed and normalizes entries into
//! [`FeedItem`]s. The feed is mostly Japanese, but syndicated wire stories
//! occasionally come through in English; a character-ratio heuristic flags
//! those for Gemini summarization.

use crate::collectors::feed;
use crate::config::{Config, NIKKEI_TECH_RSS};
use crate::models::{FeedItem, Source};
use chrono::{DateTime, Local};
use feed_rs::model::Feed;
use tracing::{error, info, instrument, warn};

pub struct NikkeiCollector {
    client: reqwest::Client,
    rss_url: String,
    max_articles: usize,
}

impl NikkeiCollector {
    pub fn new(config: &Config, client: reqwest::Client) -> Self {
        Self {
            client,
            rss_url: NIKKEI_TECH_RSS.to_string(),
            max_articles: config.max_articles_per_source,
        }
    }

    /// Collect up to `max_articles` items from the Nikkei feed.
    ///
    /// Fetch or parse failures yield an empty list; they never propagate.
    #[instrument(level = "info", skip_all)]
    pub async fn collect(&self) -> Vec<FeedItem> {
        info!(url = %self.rss_url, "Fetching Nikkei RSS feed");
        match feed::fetch_feed(&self.client, &self.rss_url).await {
            Ok(parsed) => {
                let articles = items_from_feed(&parsed, self.max_articles, Local::now());
                info!(count = articles.len(), "Collected Nikkei articles");
                articles
            }
            Err(e) => {
                error!(url = %self.rss_url, error = %e, "Nikkei collection failed");
                Vec::new()
            }
        }
    }
}

/// Normalize feed entries into [`FeedItem`]s, capped at `max`.
///
/// Entries without a link are logged and skipped; no entry failure aborts
/// the rest of the feed.
pub(crate) fn items_from_feed(parsed: &Feed, max: usize, now: DateTime<Local>) -> Vec<FeedItem> {
    let mut articles = Vec::new();

    for entry in parsed.entries.iter().take(max) {
        let title = feed::entry_title(entry);
        let Some(url) = feed::entry_link(entry) else {
            warn!(%title, "Skipping Nikkei entry without a link");
            continue;
        };
        let summary = feed::entry_summary(entry);
        let needs_translation = is_english(&format!("{title} {summary}"));

        articles.push(FeedItem {
            source: Source::Nikkei,
            title,
            url,
            published: feed::entry_published(entry, now),
            summary,
            needs_translation,
            username: None,
            summary_jp: None,
        });
    }

    articles
}

/// Crude language check: the share of alphabetic characters that are ASCII
/// letters. Strictly above 0.5 counts as English; text with no alphabetic
/// characters at all counts as Japanese.
pub(crate) fn is_english(text: &str) -> bool {
    let ascii_letters = text.chars().filter(|c| c.is_ascii_alphabetic()).count();
    let total_letters = text.chars().filter(|c| c.is_alphabetic()).count();

    if total_letters == 0 {
        return false;
    }

    ascii_letters as f64 / total_letters as f64 > 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn is_english_all_ascii() {
        assert!(is_english("Apple announces new silicon"));
    }

    #[test]
    fn is_english_all_japanese() {
        assert!(!is_english("半導体大手が新工場を建設"));
    }

    #[test]
    fn is_english_no_letters_at_all() {
        assert!(!is_english("2025-07-01 12:00 !!!"));
        assert!(!is_english(""));
    }

    #[test]
    fn is_english_exact_split_is_not_english() {
        // Two ASCII letters, two kana: ratio is exactly 0.5, threshold is strict.
        assert!(!is_english("abあい"));
    }

    #[test]
    fn is_english_majority_ascii() {
        assert!(is_english("OpenAI releases modelの"));
    }

    fn many_entry_feed(n: usize) -> Feed {
        let mut items = String::new();
        for i in 0..n {
            items.push_str(&format!(
                "<item><title>Entry {i}</title><link>https://example.com/{i}</link>\
                 <description>body {i}</description></item>"
            ));
        }
        let doc = format!(
            "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel>\
             <title>t</title><link>https://example.com</link><description>d</description>\
             {items}</channel></rss>"
        );
        feed_rs::parser::parse(doc.as_bytes()).unwrap()
    }

    #[test]
    fn cap_is_enforced() {
        let parsed = many_entry_feed(25);
        let articles = items_from_feed(&parsed, 10, Local::now());
        assert_eq!(articles.len(), 10);
    }

    #[test]
    fn items_carry_source_and_fallback_date() {
        let parsed = many_entry_feed(2);
        let now = Local::now();
        let articles = items_from_feed(&parsed, 10, now);
        assert_eq!(articles[0].source, Source::Nikkei);
        // Fixture entries are undated, so publish time falls back to `now`.
        assert_eq!(articles[0].published, now);
    }

    #[test]
    fn english_entries_are_flagged() {
        let parsed = many_entry_feed(1);
        let articles = items_from_feed(&parsed, 10, Local::now());
        assert!(articles[0].needs_translation);
    }
}
