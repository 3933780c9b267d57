//! Feed collectors for the three digest sources.
//!
//! Each collector fetches one feed (or a set of per-handle feeds), caps the
//! entry count, and normalizes entries into [`crate::models::FeedItem`]s.
//!
//! # Sources
//!
//! | Source | Module | Method | needs_translation |
//! |--------|--------|--------|-------------------|
//! | Nikkei tech | [`nikkei`] | RSS | language heuristic |
//! | X (Twitter) | [`twitter`] | Nitter mirror RSS | always |
//! | TechCrunch | [`techcrunch`] | RSS | always |
//!
//! # Common patterns
//!
//! - Per-entry problems (no link) are logged and the entry skipped
//! - Per-source failures (network, malformed feed) are logged and the source
//!   yields an empty list; collection never raises past this boundary
//! - Publish timestamps fall back to collection time when the feed provides
//!   nothing parseable

pub mod feed;
pub mod nikkei;
pub mod techcrunch;
pub mod twitter;

pub use nikkei::NikkeiCollector;
pub use techcrunch::TechCrunchCollector;
pub use twitter::TwitterCollector;
