//! Data models for collected feed items and summarization tasks.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Source`]: Which feed an item came from
//! - [`FeedItem`]: A normalized article or post from any source
//! - [`TaskKey`] / [`SummaryTask`]: The projection of a [`FeedItem`] queued
//!   for Gemini summarization, with a correlation key so results can be
//!   merged back into the per-source lists without positional drift.

use chrono::{DateTime, Local};
use std::fmt;

/// The feed a [`FeedItem`] was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Nikkei tech-section RSS (mostly Japanese, occasionally English).
    Nikkei,
    /// X (Twitter) posts fetched via Nitter RSS mirrors.
    Twitter,
    /// TechCrunch RSS (English).
    TechCrunch,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Nikkei => "nikkei",
            Source::Twitter => "twitter",
            Source::TechCrunch => "techcrunch",
        };
        f.write_str(name)
    }
}

/// A normalized article or post, as produced by a collector.
///
/// Every item carries a source tag and a best-effort publish time (falling
/// back to collection time when the feed provides nothing parseable). The
/// summarizer may later attach a generated Japanese synopsis; an item flagged
/// `needs_translation` that never receives one is still rendered, using a
/// truncated excerpt of the raw text instead.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub source: Source,
    pub title: String,
    pub url: String,
    pub published: DateTime<Local>,
    /// Raw summary/description text from the feed (tweet body for social items).
    pub summary: String,
    /// Whether this item should be sent to Gemini for a Japanese summary.
    pub needs_translation: bool,
    /// Author handle, set only for social items.
    pub username: Option<String>,
    /// Generated Japanese summary, attached after summarization.
    pub summary_jp: Option<String>,
}

impl FeedItem {
    /// The text sent to the summarizer: the raw summary, or the title when
    /// the feed carried no description.
    pub fn summarizable_text(&self) -> &str {
        if self.summary.is_empty() {
            &self.title
        } else {
            &self.summary
        }
    }
}

/// Correlates a [`SummaryTask`] back to its originating [`FeedItem`].
///
/// `index` is the item's position within its per-source list at collection
/// time; the lists are not mutated between collection and merge, so the pair
/// uniquely identifies one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskKey {
    pub source: Source,
    pub index: usize,
}

/// One unit of summarization work.
#[derive(Debug, Clone)]
pub struct SummaryTask {
    pub key: TaskKey,
    /// The text to summarize.
    pub text: String,
    /// Title passed to the model as context; empty for tweets.
    pub title: String,
    /// The generated synopsis, `None` until summarization succeeds (and left
    /// `None` on failure, which is expected rather than an error state).
    pub summary_jp: Option<String>,
}

impl SummaryTask {
    pub fn new(key: TaskKey, text: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key,
            text: text.into(),
            title: title.into(),
            summary_jp: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn item(summary: &str, title: &str) -> FeedItem {
        FeedItem {
            source: Source::Nikkei,
            title: title.to_string(),
            url: "https://example.com/a".to_string(),
            published: Local::now(),
            summary: summary.to_string(),
            needs_translation: true,
            username: None,
            summary_jp: None,
        }
    }

    #[test]
    fn summarizable_text_prefers_summary() {
        let it = item("body text", "headline");
        assert_eq!(it.summarizable_text(), "body text");
    }

    #[test]
    fn summarizable_text_falls_back_to_title() {
        let it = item("", "headline");
        assert_eq!(it.summarizable_text(), "headline");
    }

    #[test]
    fn source_display_names() {
        assert_eq!(Source::Nikkei.to_string(), "nikkei");
        assert_eq!(Source::Twitter.to_string(), "twitter");
        assert_eq!(Source::TechCrunch.to_string(), "techcrunch");
    }

    #[test]
    fn task_key_equality() {
        let a = TaskKey { source: Source::TechCrunch, index: 3 };
        let b = TaskKey { source: Source::TechCrunch, index: 3 };
        let c = TaskKey { source: Source::Twitter, index: 3 };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
