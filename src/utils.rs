//! Utility functions for time formatting, string truncation, and file
//! system checks.

use chrono::{DateTime, Local};
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string to `max` characters, appending an ellipsis when cut.
///
/// Operates on characters rather than bytes so Japanese text is never split
/// mid-codepoint.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{head}...")
    }
}

/// Truncate a string for logging purposes, noting how much was dropped.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let total = s.chars().count();
    if total <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{head}…(+{} chars)", total - max)
    }
}

/// Human relative-time label in Japanese for a publish timestamp.
///
/// Day, hour, and minute granularity; anything under a minute (including
/// timestamps slightly in the future from clock skew) is "たった今".
pub fn relative_time(published: DateTime<Local>, now: DateTime<Local>) -> String {
    let diff = now.signed_duration_since(published);
    let secs = diff.num_seconds().max(0);

    if secs >= 86_400 {
        format!("{}日前", secs / 86_400)
    } else if secs >= 3_600 {
        format!("{}時間前", secs / 3_600)
    } else if secs >= 60 {
        format!("{}分前", secs / 60)
    } else {
        "たった今".to_string()
    }
}

/// Format a timestamp as `YYYY-MM-DD HH:MM`.
pub fn format_datetime(dt: DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if missing, then performs a write probe by creating
/// and deleting a throwaway file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
