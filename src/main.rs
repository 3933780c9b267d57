//! # Daily Vibes
//!
//! An IT-trend digest builder that collects articles from the Nikkei tech
//! section and TechCrunch plus posts from a watched list of X accounts,
//! summarizes foreign-language items into Japanese through the Gemini API,
//! and writes one app-style Markdown digest per day.
//!
//! ## Usage
//!
//! ```sh
//! daily_vibes -o ./daily_vibes
//! ```
//!
//! ## Architecture
//!
//! The run is a fully sequential pipeline:
//! 1. **Collection**: each source is fetched independently; a dead feed
//!    yields zero items without blocking the others
//! 2. **Summarization**: items flagged `needs_translation` are sent to
//!    Gemini one at a time (skipped entirely when no API key is configured)
//! 3. **Output**: the merged lists are rendered into `log_YYYYMMDD.md`

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt as tfmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod cli;
mod collectors;
mod config;
mod models;
mod outputs;
mod summarizer;
mod utils;

use cli::Cli;
use collectors::{NikkeiCollector, TechCrunchCollector, TwitterCollector};
use config::Config;
use models::{FeedItem, Source, SummaryTask, TaskKey};
use outputs::markdown::MarkdownWriter;
use summarizer::Summarizer;
use utils::ensure_writable_dir;

const LOG_FILE: &str = "daily_vibes.log";

#[tokio::main]
async fn main() -> ExitCode {
    // .env before clap, so env-backed arguments pick the values up.
    dotenvy::dotenv().ok();
    let log_file_error = init_tracing();

    let start_time = std::time::Instant::now();
    info!("============================================================");
    info!("IT trend watcher & vibes collector starting up");
    info!("============================================================");

    if let Some(e) = log_file_error {
        warn!(path = LOG_FILE, error = %e, "Could not open log file; logging to stdout only");
    }

    let args = Cli::parse();
    let config = Config::from_cli(&args);

    tokio::select! {
        result = run(&config) => match result {
            Ok(path) => {
                let elapsed = start_time.elapsed();
                info!("============================================================");
                info!(path = %path.display(), secs = elapsed.as_secs(), "Run completed successfully");
                info!("============================================================");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "Run failed");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            warn!("Run interrupted by user");
            ExitCode::FAILURE
        }
    }
}

/// Stdout logging plus an append-mode copy in `daily_vibes.log`.
///
/// Returns the open error when the log file is unavailable; the run
/// continues with stdout only.
fn init_tracing() -> Option<std::io::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = tfmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tfmt::time::UtcTime::rfc_3339());
    let registry = tracing_subscriber::registry().with(filter).with(stdout_layer);

    match OpenOptions::new().create(true).append(true).open(LOG_FILE) {
        Ok(file) => {
            registry
                .with(tfmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
            None
        }
        Err(e) => {
            registry.init();
            Some(e)
        }
    }
}

async fn run(config: &Config) -> Result<PathBuf, Box<dyn Error>> {
    // Fail fast if the digest can never be written.
    ensure_writable_dir(&config.output_dir).await?;

    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .user_agent(concat!("daily_vibes/", env!("CARGO_PKG_VERSION")))
        .build()?;

    // ---- Step 1: collection ----
    info!("[Step 1] Collecting from all sources");

    let nikkei_collector = NikkeiCollector::new(config, client.clone());
    let twitter_collector = TwitterCollector::new(config, client.clone());
    let techcrunch_collector = TechCrunchCollector::new(config, client.clone());

    let mut nikkei_articles = nikkei_collector.collect().await;
    info!(count = nikkei_articles.len(), "Nikkei collection done");

    let mut twitter_tweets = twitter_collector.collect().await;
    info!(count = twitter_tweets.len(), "Twitter collection done");

    let mut techcrunch_articles = techcrunch_collector.collect().await;
    info!(count = techcrunch_articles.len(), "TechCrunch collection done");

    // ---- Step 2: summarization ----
    info!("[Step 2] Summarizing flagged items");

    let tasks = build_summary_tasks(&nikkei_articles, &twitter_tweets, &techcrunch_articles);
    info!(count = tasks.len(), "Items flagged for summarization");

    match Summarizer::from_config(config, client.clone()) {
        Some(summarizer) => {
            let results = summarizer.summarize_batch(tasks).await;
            merge_summaries(
                results,
                &mut nikkei_articles,
                &mut twitter_tweets,
                &mut techcrunch_articles,
            );
            info!("Summarization stage complete");
        }
        None => {
            warn!("GEMINI_API_KEY is not configured; skipping summarization, items pass through unsummarized");
        }
    }

    // ---- Step 3: digest output ----
    info!("[Step 3] Writing the daily digest");

    let writer = MarkdownWriter::new(config.output_dir.clone());
    let path = writer
        .write(
            Local::now(),
            &nikkei_articles,
            &twitter_tweets,
            &techcrunch_articles,
        )
        .await?;

    info!(path = %path.display(), "Digest written");
    Ok(path)
}

/// Project every `needs_translation` item into a [`SummaryTask`] carrying a
/// `(source, index)` correlation key for the merge step.
///
/// Tweets get no title context; news items pass their headline through.
fn build_summary_tasks(
    nikkei: &[FeedItem],
    tweets: &[FeedItem],
    techcrunch: &[FeedItem],
) -> Vec<SummaryTask> {
    let lists = [
        (Source::Nikkei, nikkei),
        (Source::Twitter, tweets),
        (Source::TechCrunch, techcrunch),
    ];

    let mut tasks = Vec::new();
    for (source, list) in lists {
        for (index, item) in list.iter().enumerate() {
            if !item.needs_translation {
                continue;
            }
            let title = if source == Source::Twitter {
                ""
            } else {
                item.title.as_str()
            };
            tasks.push(SummaryTask::new(
                TaskKey { source, index },
                item.summarizable_text(),
                title,
            ));
        }
    }
    tasks
}

/// Attach generated synopses back onto the per-source lists by correlation
/// key. Tasks without a synopsis are no-ops; out-of-range keys are logged
/// and dropped.
fn merge_summaries(
    tasks: Vec<SummaryTask>,
    nikkei: &mut [FeedItem],
    tweets: &mut [FeedItem],
    techcrunch: &mut [FeedItem],
) {
    for task in tasks {
        let Some(summary_jp) = task.summary_jp else {
            continue;
        };

        let list: &mut [FeedItem] = match task.key.source {
            Source::Nikkei => nikkei,
            Source::Twitter => tweets,
            Source::TechCrunch => techcrunch,
        };

        match list.get_mut(task.key.index) {
            Some(item) => item.summary_jp = Some(summary_jp),
            None => warn!(
                source = %task.key.source,
                index = task.key.index,
                "Summary result does not match any collected item; dropping"
            ),
        }
    }
}
