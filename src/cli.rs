//! Command-line interface definitions for the daily vibes collector.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Credentials and most knobs can be provided via environment variables
//! (a `.env` file in the working directory is loaded at startup).

use clap::Parser;

/// Command-line arguments for the daily vibes collector.
///
/// # Examples
///
/// ```sh
/// # Default output directory (./daily_vibes)
/// daily_vibes
///
/// # Custom output directory and explicit API key
/// daily_vibes -o ./digests --gemini-api-key YOUR_KEY
///
/// # Extra handles to watch
/// daily_vibes --targets karpathy --targets simonw
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the daily Markdown digest
    #[arg(short, long, default_value = "daily_vibes")]
    pub output_dir: String,

    /// Gemini API key; summarization is skipped when absent
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// X (Twitter) API key, reserved for a future API-based collector
    #[arg(long, env = "TWITTER_API_KEY", hide_env_values = true)]
    pub twitter_api_key: Option<String>,

    /// X (Twitter) API secret, reserved for a future API-based collector
    #[arg(long, env = "TWITTER_API_SECRET", hide_env_values = true)]
    pub twitter_api_secret: Option<String>,

    /// Handles to collect posts from (repeatable; replaces the default list)
    #[arg(long = "targets")]
    pub targets: Vec<String>,

    /// Maximum articles collected per news feed
    #[arg(long, default_value_t = 10)]
    pub max_articles: usize,

    /// Maximum posts collected per handle
    #[arg(long, default_value_t = 5)]
    pub max_tweets: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["daily_vibes"]);
        assert_eq!(cli.output_dir, "daily_vibes");
        assert_eq!(cli.max_articles, 10);
        assert_eq!(cli.max_tweets, 5);
        assert!(cli.targets.is_empty());
    }

    #[test]
    fn test_cli_output_dir_short_flag() {
        let cli = Cli::parse_from(["daily_vibes", "-o", "/tmp/digests"]);
        assert_eq!(cli.output_dir, "/tmp/digests");
    }

    #[test]
    fn test_cli_repeatable_targets() {
        let cli = Cli::parse_from(["daily_vibes", "--targets", "karpathy", "--targets", "simonw"]);
        assert_eq!(cli.targets, vec!["karpathy", "simonw"]);
    }
}
