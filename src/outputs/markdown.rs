//! Daily digest Markdown generation.
//!
//! Renders the three collected item lists into one app-style Japanese
//! Markdown document and writes it to `{output_dir}/log_YYYYMMDD.md`.
//! One file per calendar day; a rerun on the same day overwrites the
//! earlier file.

use crate::models::FeedItem;
use crate::utils::{format_datetime, relative_time, truncate_chars};
use chrono::{DateTime, Datelike, Local};
use std::error::Error;
use std::fmt::Write as _;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Character cutoff for raw news excerpts.
const NEWS_EXCERPT_CHARS: usize = 300;
/// Character cutoff for tweet bodies.
const TWEET_EXCERPT_CHARS: usize = 280;

const WEEKDAYS_JP: [&str; 7] = ["月", "火", "水", "木", "金", "土", "日"];

pub struct MarkdownWriter {
    output_dir: String,
}

impl MarkdownWriter {
    pub fn new(output_dir: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Render and write the digest for `date`.
    ///
    /// Write failures are fatal for the run and propagate to the caller.
    #[instrument(level = "info", skip_all, fields(output_dir = %self.output_dir))]
    pub async fn write(
        &self,
        date: DateTime<Local>,
        nikkei: &[FeedItem],
        tweets: &[FeedItem],
        techcrunch: &[FeedItem],
    ) -> Result<PathBuf, Box<dyn Error>> {
        let document = render(date, Local::now(), nikkei, tweets, techcrunch);

        fs::create_dir_all(&self.output_dir).await?;
        let path = PathBuf::from(&self.output_dir).join(format!("log_{}.md", date.format("%Y%m%d")));

        if let Err(e) = fs::write(&path, document).await {
            error!(path = %path.display(), error = %e, "Failed writing digest");
            return Err(e.into());
        }

        info!(path = %path.display(), "Wrote daily digest");
        Ok(path)
    }
}

/// Render the full digest document.
///
/// `now` drives relative-time labels and the footer timestamp; it is passed
/// in so rendering stays deterministic under test.
pub fn render(
    date: DateTime<Local>,
    now: DateTime<Local>,
    nikkei: &[FeedItem],
    tweets: &[FeedItem],
    techcrunch: &[FeedItem],
) -> String {
    let mut md = String::new();

    render_header(&mut md, date, nikkei.len(), tweets.len(), techcrunch.len());
    render_nikkei_section(&mut md, nikkei, now);
    render_twitter_section(&mut md, tweets, now);
    render_techcrunch_section(&mut md, techcrunch, now);
    render_footer(&mut md, now);

    md
}

fn render_header(
    md: &mut String,
    date: DateTime<Local>,
    nikkei_count: usize,
    tweet_count: usize,
    techcrunch_count: usize,
) {
    let total = nikkei_count + tweet_count + techcrunch_count;
    let weekday = WEEKDAYS_JP[date.weekday().num_days_from_monday() as usize];

    writeln!(md, "---").unwrap();
    writeln!(md, "# 📱 ITトレンド・ウォッチャー\n").unwrap();
    writeln!(md, "<div align=\"center\">\n").unwrap();
    writeln!(md, "### 📅 {}（{weekday}）\n", date.format("%Y年%m月%d日")).unwrap();
    writeln!(md, "**📊 本日の収集結果**\n").unwrap();
    writeln!(md, "| 📰 日経 | 🐦 Twitter | 🌐 TechCrunch | 📈 合計 |").unwrap();
    writeln!(md, "|:---:|:---:|:---:|:---:|").unwrap();
    writeln!(
        md,
        "| **{nikkei_count}** | **{tweet_count}** | **{techcrunch_count}** | **{total}** |\n"
    )
    .unwrap();
    writeln!(md, "</div>\n").unwrap();
    writeln!(md, "---\n").unwrap();
}

fn render_empty_section(md: &mut String, message: &str) {
    writeln!(md, "<div align=\"center\" style=\"padding: 40px;\">\n").unwrap();
    writeln!(md, "📭 {message}\n").unwrap();
    writeln!(md, "</div>\n").unwrap();
}

fn render_nikkei_section(md: &mut String, articles: &[FeedItem], now: DateTime<Local>) {
    writeln!(md, "## 🇯🇵 日経電子版テック面\n").unwrap();

    if articles.is_empty() {
        render_empty_section(md, "本日の記事はありません");
        return;
    }

    for (idx, article) in articles.iter().enumerate() {
        writeln!(md, "### 📄 {}. [{}]({})\n", idx + 1, article.title, article.url).unwrap();
        writeln!(
            md,
            "<div style=\"background-color: #f6f8fa; padding: 12px; border-radius: 8px; margin: 8px 0;\">\n"
        )
        .unwrap();
        writeln!(
            md,
            "**🕐 公開日時**: `{}` ({})\n",
            format_datetime(article.published),
            relative_time(article.published, now)
        )
        .unwrap();

        if let Some(summary_jp) = &article.summary_jp {
            writeln!(md, "**📝 AI要約**:\n").unwrap();
            writeln!(md, "> {summary_jp}\n").unwrap();
        } else if !article.summary.is_empty() {
            writeln!(md, "**📄 概要**:\n").unwrap();
            writeln!(md, "> {}\n", truncate_chars(&article.summary, NEWS_EXCERPT_CHARS)).unwrap();
        }

        writeln!(md, "**🔗 [記事を読む →]({})**\n", article.url).unwrap();
        writeln!(md, "</div>\n").unwrap();
        writeln!(md, "---\n").unwrap();
    }
}

fn render_twitter_section(md: &mut String, tweets: &[FeedItem], now: DateTime<Local>) {
    writeln!(md, "## 🐦 X（Twitter）\n").unwrap();

    if tweets.is_empty() {
        render_empty_section(md, "本日のツイートはありません");
        return;
    }

    for (username, group) in group_by_username(tweets) {
        writeln!(md, "### 👤 @{username}\n").unwrap();

        for (idx, tweet) in group.iter().enumerate() {
            writeln!(md, "**💬 ツイート #{}**\n", idx + 1).unwrap();
            writeln!(
                md,
                "<div style=\"background-color: #f0f9ff; padding: 12px; border-left: 4px solid #1da1f2; border-radius: 8px; margin: 8px 0;\">\n"
            )
            .unwrap();

            if !tweet.summary.is_empty() {
                // Truncate first, then turn line breaks into Markdown hard breaks.
                let body = truncate_chars(&tweet.summary, TWEET_EXCERPT_CHARS).replace('\n', "  \n");
                writeln!(md, "{body}\n").unwrap();
            }

            writeln!(
                md,
                "**🕐 投稿日時**: `{}` ({})\n",
                format_datetime(tweet.published),
                relative_time(tweet.published, now)
            )
            .unwrap();

            if let Some(summary_jp) = &tweet.summary_jp {
                writeln!(md, "**📝 AI要約**:\n").unwrap();
                writeln!(md, "> {summary_jp}\n").unwrap();
            }

            writeln!(md, "**🔗 [ツイートを見る →]({})**\n", tweet.url).unwrap();
            writeln!(md, "</div>\n").unwrap();
        }

        writeln!(md, "---\n").unwrap();
    }
}

fn render_techcrunch_section(md: &mut String, articles: &[FeedItem], now: DateTime<Local>) {
    writeln!(md, "## 🌐 TechCrunch\n").unwrap();

    if articles.is_empty() {
        render_empty_section(md, "本日の記事はありません");
        return;
    }

    for (idx, article) in articles.iter().enumerate() {
        writeln!(md, "### 🚀 {}. [{}]({})\n", idx + 1, article.title, article.url).unwrap();
        writeln!(
            md,
            "<div style=\"background-color: #fff5f5; padding: 12px; border-radius: 8px; margin: 8px 0;\">\n"
        )
        .unwrap();
        writeln!(
            md,
            "**🕐 公開日時**: `{}` ({})\n",
            format_datetime(article.published),
            relative_time(article.published, now)
        )
        .unwrap();

        if let Some(summary_jp) = &article.summary_jp {
            writeln!(md, "**📝 AI要約**:\n").unwrap();
            writeln!(md, "> {summary_jp}\n").unwrap();
        } else if !article.summary.is_empty() {
            writeln!(md, "**📄 概要**:\n").unwrap();
            writeln!(md, "> {}\n", truncate_chars(&article.summary, NEWS_EXCERPT_CHARS)).unwrap();
        }

        writeln!(md, "**🔗 [記事を読む →]({})**\n", article.url).unwrap();
        writeln!(md, "</div>\n").unwrap();
        writeln!(md, "---\n").unwrap();
    }
}

fn render_footer(md: &mut String, now: DateTime<Local>) {
    writeln!(md, "\n---\n").unwrap();
    writeln!(md, "<div align=\"center\">\n").unwrap();
    writeln!(md, "**🤖 自動生成レポート**\n").unwrap();
    writeln!(md, "生成日時: `{}`\n", format_datetime(now)).unwrap();
    writeln!(md, "---\n").unwrap();
    writeln!(md, "**💡 このレポートは毎日自動的に更新されます**\n").unwrap();
    writeln!(md, "</div>").unwrap();
}

/// Group tweets by author handle, preserving first-appearance order of
/// handles and the item order within each group.
fn group_by_username(tweets: &[FeedItem]) -> Vec<(&str, Vec<&FeedItem>)> {
    let mut groups: Vec<(&str, Vec<&FeedItem>)> = Vec::new();

    for tweet in tweets {
        let username = tweet.username.as_deref().unwrap_or("unknown");
        match groups.iter_mut().find(|(name, _)| *name == username) {
            Some((_, members)) => members.push(tweet),
            None => groups.push((username, vec![tweet])),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Source;

    fn news_item(source: Source, title: &str, summary: &str, summary_jp: Option<&str>) -> FeedItem {
        FeedItem {
            source,
            title: title.to_string(),
            url: format!("https://example.com/{}", title.replace(' ', "-")),
            published: Local::now(),
            summary: summary.to_string(),
            needs_translation: true,
            username: None,
            summary_jp: summary_jp.map(str::to_string),
        }
    }

    fn tweet(username: &str, body: &str) -> FeedItem {
        FeedItem {
            source: Source::Twitter,
            title: String::new(),
            url: format!("https://nitter.net/{username}/status/1"),
            published: Local::now(),
            summary: body.to_string(),
            needs_translation: true,
            username: Some(username.to_string()),
            summary_jp: None,
        }
    }

    #[test]
    fn empty_sections_render_placeholders() {
        let doc = render(Local::now(), Local::now(), &[], &[], &[]);
        assert!(doc.contains("本日の記事はありません"));
        assert!(doc.contains("本日のツイートはありません"));
        // Section headers are present even when empty.
        assert!(doc.contains("## 🇯🇵 日経電子版テック面"));
        assert!(doc.contains("## 🐦 X（Twitter）"));
        assert!(doc.contains("## 🌐 TechCrunch"));
    }

    #[test]
    fn counts_table_totals() {
        let nikkei = vec![news_item(Source::Nikkei, "a", "s", None)];
        let tc = vec![
            news_item(Source::TechCrunch, "b", "s", None),
            news_item(Source::TechCrunch, "c", "s", None),
        ];
        let doc = render(Local::now(), Local::now(), &nikkei, &[], &tc);
        assert!(doc.contains("| **1** | **0** | **2** | **3** |"));
    }

    #[test]
    fn synopsis_block_vs_excerpt_fallback() {
        let with_synopsis = news_item(Source::TechCrunch, "summarized", "raw body", Some("AI要約本文"));
        let without = news_item(Source::TechCrunch, "plain", "just the raw body", None);
        let doc = render(Local::now(), Local::now(), &[], &[], &[with_synopsis, without]);

        assert!(doc.contains("AI要約本文"));
        assert!(doc.contains("> just the raw body"));
        // Exactly one AI-summary block: the second item fell back to the excerpt.
        assert_eq!(doc.matches("**📝 AI要約**").count(), 1);
    }

    #[test]
    fn unsummarized_run_falls_back_to_excerpts() {
        // A run without a Gemini key leaves flagged items with no synopsis;
        // the digest must show raw excerpts, never an AI-summary block.
        let mut english = news_item(Source::Nikkei, "All English entry", "english feed body", None);
        english.needs_translation = true;
        let doc = render(Local::now(), Local::now(), &[english], &[], &[]);

        assert!(doc.contains("**📄 概要**"));
        assert!(doc.contains("> english feed body"));
        assert!(!doc.contains("**📝 AI要約**"));
    }

    #[test]
    fn long_news_excerpt_is_truncated() {
        let long = "x".repeat(400);
        let item = news_item(Source::Nikkei, "long", &long, None);
        let doc = render(Local::now(), Local::now(), &[item], &[], &[]);
        assert!(doc.contains(&format!("{}...", "x".repeat(300))));
        assert!(!doc.contains(&"x".repeat(301)));
    }

    #[test]
    fn tweets_grouped_by_handle_in_first_seen_order() {
        let tweets = vec![tweet("karpathy", "one"), tweet("jasonlk", "two"), tweet("karpathy", "three")];
        let doc = render(Local::now(), Local::now(), &[], &tweets, &[]);

        let karpathy_pos = doc.find("### 👤 @karpathy").unwrap();
        let jasonlk_pos = doc.find("### 👤 @jasonlk").unwrap();
        assert!(karpathy_pos < jasonlk_pos);
        // Both karpathy tweets land under one heading.
        assert_eq!(doc.matches("### 👤 @karpathy").count(), 1);
    }

    #[test]
    fn tweet_line_breaks_become_hard_breaks() {
        let tweets = vec![tweet("k", "line one\nline two")];
        let doc = render(Local::now(), Local::now(), &[], &tweets, &[]);
        assert!(doc.contains("line one  \nline two"));
    }

    #[test]
    fn long_tweet_body_is_truncated() {
        let tweets = vec![tweet("k", &"y".repeat(400))];
        let doc = render(Local::now(), Local::now(), &[], &tweets, &[]);
        assert!(doc.contains(&format!("{}...", "y".repeat(280))));
    }

    #[test]
    fn group_by_username_handles_missing_handle() {
        let mut stray = tweet("k", "body");
        stray.username = None;
        let groups = group_by_username(std::slice::from_ref(&stray));
        assert_eq!(groups[0].0, "unknown");
    }

    #[tokio::test]
    async fn write_creates_dated_file_and_overwrites() {
        let dir = std::env::temp_dir().join(format!("daily_vibes_test_{}", std::process::id()));
        let writer = MarkdownWriter::new(dir.to_string_lossy().to_string());
        let date = Local::now();

        let path = writer.write(date, &[], &[], &[]).await.unwrap();
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            format!("log_{}.md", date.format("%Y%m%d"))
        );

        // Second run on the same day replaces the file.
        let item = news_item(Source::Nikkei, "second run", "body", None);
        let path2 = writer.write(date, &[item], &[], &[]).await.unwrap();
        assert_eq!(path, path2);
        let contents = tokio::fs::read_to_string(&path2).await.unwrap();
        assert!(contents.contains("second run"));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
