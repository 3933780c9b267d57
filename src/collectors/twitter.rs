//! X (Twitter) post collector via Nitter RSS mirrors.
//!
//! The official API is paywalled, so posts are pulled from Nitter instances,
//! which serve per-account RSS. Instances come and go; for each handle the
//! configured mirror list is walked in priority order and the first one that
//! answers HTTP 200 with a parseable feed wins. A handle whose mirrors are
//! all exhausted yields zero items and the run moves on.

use crate::collectors::feed;
use crate::config::{Config, NITTER_INSTANCES};
use crate::models::{FeedItem, Source};
use chrono::{DateTime, Local};
use feed_rs::model::Feed;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::error::Error;
use tracing::{error, info, instrument, warn};
use url::Url;

pub struct TwitterCollector {
    client: reqwest::Client,
    targets: Vec<String>,
    max_tweets: usize,
}

impl TwitterCollector {
    pub fn new(config: &Config, client: reqwest::Client) -> Self {
        Self {
            client,
            targets: config.twitter_targets.clone(),
            max_tweets: config.max_tweets_per_user,
        }
    }

    /// Collect recent posts for every configured handle, in handle order.
    ///
    /// Failures are scoped per handle; one unreachable account never blocks
    /// the others.
    #[instrument(level = "info", skip_all)]
    pub async fn collect(&self) -> Vec<FeedItem> {
        let all_tweets: Vec<FeedItem> = stream::iter(&self.targets)
            .then(|username| async move {
                info!(%username, "Collecting posts");
                self.collect_user(username).await
            })
            .collect::<Vec<Vec<FeedItem>>>()
            .await
            .into_iter()
            .flatten()
            .collect();

        info!(count = all_tweets.len(), "Collected posts across all handles");
        all_tweets
    }

    /// Walk the mirror list for one handle, stopping at the first instance
    /// that serves a usable feed.
    async fn collect_user(&self, username: &str) -> Vec<FeedItem> {
        for instance in NITTER_INSTANCES {
            match self.try_instance(instance, username).await {
                Ok(tweets) => {
                    info!(%username, %instance, count = tweets.len(), "Fetched posts from mirror");
                    return tweets;
                }
                Err(e) => {
                    warn!(%username, %instance, error = %e, "Mirror attempt failed");
                }
            }
        }

        error!(%username, "All mirrors exhausted; yielding no posts for this handle");
        Vec::new()
    }

    async fn try_instance(
        &self,
        instance: &str,
        username: &str,
    ) -> Result<Vec<FeedItem>, Box<dyn Error>> {
        let rss_url = Url::parse(instance)?.join(&format!("{username}/rss"))?;

        let response = self.client.get(rss_url.as_str()).send().await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(format!("mirror returned HTTP {}", response.status()).into());
        }

        let body = response.bytes().await?;
        let parsed = feed_rs::parser::parse(body.as_ref())?;
        Ok(items_from_feed(&parsed, username, self.max_tweets, Local::now()))
    }
}

pub(crate) fn items_from_feed(
    parsed: &Feed,
    username: &str,
    max: usize,
    now: DateTime<Local>,
) -> Vec<FeedItem> {
    parsed
        .entries
        .iter()
        .take(max)
        .map(|entry| {
            let content = feed::entry_title(entry);
            let url = feed::entry_link(entry)
                .unwrap_or_else(|| format!("https://twitter.com/{username}/status/unknown"));

            FeedItem {
                source: Source::Twitter,
                title: String::new(),
                url,
                published: feed::entry_published(entry, now),
                summary: content,
                needs_translation: true,
                username: Some(username.to_string()),
                summary_jp: None,
            }
        })
        // Nitter repeats a pinned tweet at the top of the feed.
        .unique_by(|t| t.url.clone())
        .collect()
}
