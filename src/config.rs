//! Application configuration.
//!
//! One immutable [`Config`] value is built at startup from CLI arguments and
//! the environment (a `.env` file is loaded before parsing) and passed by
//! reference to each pipeline stage. Feed URLs, the Nitter mirror list, and
//! the Gemini generation parameters are configuration-with-defaults rather
//! than hardcoded at their call sites.

use crate::cli::Cli;
use std::time::Duration;

/// Nikkei tech-section RSS feed.
pub const NIKKEI_TECH_RSS: &str = "https://www.nikkei.com/technology/rss.xml";
/// TechCrunch main RSS feed.
pub const TECHCRUNCH_RSS: &str = "https://techcrunch.com/feed/";

/// Nitter mirrors tried in priority order for each handle.
pub const NITTER_INSTANCES: &[&str] = &[
    "https://nitter.net",
    "https://nitter.it",
    "https://nitter.pussthecat.org",
];

/// Default handles to collect posts from.
const DEFAULT_TARGETS: &[&str] = &["karpathy", "jasonlk"];

/// Immutable runtime configuration for one digest run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key; `None` disables the summarization stage.
    pub gemini_api_key: Option<String>,
    /// Reserved X API credentials, accepted but not used by the RSS flow.
    pub twitter_api_key: Option<String>,
    pub twitter_api_secret: Option<String>,
    /// Handles whose posts are collected via Nitter.
    pub twitter_targets: Vec<String>,
    /// Directory the daily digest file is written into.
    pub output_dir: String,
    /// Per-news-feed article cap.
    pub max_articles_per_source: usize,
    /// Per-handle post cap.
    pub max_tweets_per_user: usize,
    /// Gemini model identifier.
    pub gemini_model: String,
    /// Generation token limit per summary.
    pub gemini_max_tokens: u32,
    /// Fixed sampling temperature.
    pub gemini_temperature: f32,
    /// Timeout applied to every HTTP call.
    pub http_timeout: Duration,
}

impl Config {
    /// Build the configuration from parsed CLI arguments.
    ///
    /// Env-backed fields (API keys) arrive already resolved by clap.
    pub fn from_cli(cli: &Cli) -> Self {
        let twitter_targets = if cli.targets.is_empty() {
            DEFAULT_TARGETS.iter().map(|s| s.to_string()).collect()
        } else {
            cli.targets.clone()
        };

        Self {
            gemini_api_key: cli.gemini_api_key.clone().filter(|k| !k.is_empty()),
            twitter_api_key: cli.twitter_api_key.clone(),
            twitter_api_secret: cli.twitter_api_secret.clone(),
            twitter_targets,
            output_dir: cli.output_dir.clone(),
            max_articles_per_source: cli.max_articles,
            max_tweets_per_user: cli.max_tweets,
            gemini_model: "gemini-pro".to_string(),
            gemini_max_tokens: 500,
            gemini_temperature: 0.7,
            http_timeout: Duration::from_secs(10),
        }
    }
}
