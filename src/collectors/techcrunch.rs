//! TechCrunch article collector.
//!
//! Same shape as the Nikkei collector, minus the language heuristic:
//! TechCrunch publishes in English, so every item is flagged for
//! summarization.

use crate::collectors::feed;
use crate::config::{Config, TECHCRUNCH_RSS};
use crate::models::{FeedItem, Source};
use chrono::{DateTime, Local};
use feed_rs::model::Feed;
use tracing::{error, info, instrument, warn};

pub struct TechCrunchCollector {
    client: reqwest::Client,
    rss_url: String,
    max_articles: usize,
}

impl TechCrunchCollector {
    pub fn new(config: &Config, client: reqwest::Client) -> Self {
        Self {
            client,
            rss_url: TECHCRUNCH_RSS.to_string(),
            max_articles: config.max_articles_per_source,
        }
    }

    /// Collect up to `max_articles` items from the TechCrunch feed.
    ///
    /// Fetch or parse failures yield an empty list; they never propagate.
    #[instrument(level = "info", skip_all)]
    pub async fn collect(&self) -> Vec<FeedItem> {
        info!(url = %self.rss_url, "Fetching TechCrunch RSS feed");
        match feed::fetch_feed(&self.client, &self.rss_url).await {
            Ok(parsed) => {
                let articles = items_from_feed(&parsed, self.max_articles, Local::now());
                info!(count = articles.len(), "Collected TechCrunch articles");
                articles
            }
            Err(e) => {
                error!(url = %self.rss_url, error = %e, "TechCrunch collection failed");
                Vec::new()
            }
        }
    }
}

pub(crate) fn items_from_feed(parsed: &Feed, max: usize, now: DateTime<Local>) -> Vec<FeedItem> {
    let mut articles = Vec::new();

    for entry in parsed.entries.iter().take(max) {
        let title = feed::entry_title(entry);
        let Some(url) = feed::entry_link(entry) else {
            warn!(%title, "Skipping TechCrunch entry without a link");
            continue;
        };

        articles.push(FeedItem {
            source: Source::TechCrunch,
            title,
            url,
            published: feed::entry_published(entry, now),
            summary: feed::entry_summary(entry),
            needs_translation: true,
            username: None,
            summary_jp: None,
        });
    }

    articles
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn feed_with(items: &str) -> Feed {
        let doc = format!(
            "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel>\
             <title>TechCrunch</title><link>https://techcrunch.com</link>\
             <description>d</description>{items}</channel></rss>"
        );
        feed_rs::parser::parse(doc.as_bytes()).unwrap()
    }

    #[test]
    fn every_item_needs_translation() {
        let parsed = feed_with(
            "<item><title>Startup raises $10M</title>\
             <link>https://techcrunch.com/a</link>\
             <description>Funding round news.</description></item>",
        );
        let articles = items_from_feed(&parsed, 10, Local::now());
        assert_eq!(articles.len(), 1);
        assert!(articles[0].needs_translation);
        assert_eq!(articles[0].source, Source::TechCrunch);
    }

    #[test]
    fn linkless_entries_are_skipped() {
        let parsed = feed_with(
            "<item><title>Orphan</title><description>no link</description></item>\
             <item><title>Kept</title><link>https://techcrunch.com/b</link>\
             <description>ok</description></item>",
        );
        let articles = items_from_feed(&parsed, 10, Local::now());
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Kept");
    }

    #[test]
    fn cap_is_enforced() {
        let mut items = String::new();
        for i in 0..30 {
            items.push_str(&format!(
                "<item><title>e{i}</title><link>https://techcrunch.com/{i}</link></item>"
            ));
        }
        let parsed = feed_with(&items);
        assert_eq!(items_from_feed(&parsed, 10, Local::now()).len(), 10);
    }
}
