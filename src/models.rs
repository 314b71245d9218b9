//! Data models for the news feed artifact.
//!
//! A run produces exactly one [`ResultSet`] holding up to `limit`
//! [`NewsItem`]s, and the `mode` field records which acquisition strategy
//! actually produced them so the consuming site can tell a healthy API run
//! from a scraped fallback or a diagnostic failure.

use chrono::Utc;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A single news post: the only four fields the static site renders.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct NewsItem {
    /// Headline, markup-free, never empty.
    pub title: String,
    /// Absolute canonical post URL; unique within a result set.
    pub url: String,
    /// ISO-8601 publish date/time when known, otherwise empty.
    pub date: String,
    /// Markup-free excerpt, possibly empty.
    pub excerpt: String,
}

/// Which strategy produced the items, or how the run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// WordPress REST API answered with posts.
    Api,
    /// Items scraped from the tag listing page HTML.
    HtmlFallback,
    /// Items recovered by raw URL pattern scanning.
    PatternFallback,
    /// Every strategy failed or came back empty.
    Error,
    /// An unexpected failure escaped the pipeline; minimal diagnostic payload.
    FatalError,
}

/// The complete output artifact for one run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResultSet {
    /// Canonical listing URL that was queried.
    pub source: String,
    pub mode: Mode,
    /// Items in discovery order, never re-sorted.
    pub items: Vec<NewsItem>,
    /// Why higher-priority strategies were abandoned, when any were.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Serialized failure description, present on `error` / `fatal-error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// RFC 3339 UTC timestamp of this run.
    pub generated_at: String,
}

impl ResultSet {
    pub fn new(source: impl Into<String>, mode: Mode, items: Vec<NewsItem>) -> Self {
        ResultSet {
            source: source.into(),
            mode,
            items,
            note: None,
            error: None,
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Enforce the item invariants in one place: drop entries missing a title
/// or URL, keep the first occurrence of each URL, cap at `limit`.
/// Discovery order is preserved.
pub fn collect_items(
    items: impl IntoIterator<Item = NewsItem>,
    limit: usize,
) -> Vec<NewsItem> {
    items
        .into_iter()
        .filter(|item| !item.title.is_empty() && !item.url.is_empty())
        .unique_by(|item| item.url.clone())
        .take(limit)
        .collect()
}
