//! Per-post metadata recovery, shared by the HTML strategies.
//!
//! Listing pages only reliably give a link and an anchor text; the post
//! page itself usually carries a canonical headline in `og:title` and a
//! publish timestamp in `article:published_time`. When even those are
//! missing, the permalink's `/YYYY/MM/DD/` segment still dates the post.
//!
//! A metadata fetch that fails downgrades that one item to its
//! listing-derived fields; it never fails the strategy.

use crate::models::NewsItem;
use crate::text::normalize;
use crate::transport::{Accept, Transport};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};

static URL_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(\d{4})/(\d{2})/(\d{2})/").unwrap());

/// Metadata recovered from a single post page.
#[derive(Debug, Default, PartialEq)]
pub struct PostMeta {
    pub title: Option<String>,
    pub date: Option<String>,
}

/// Pull canonical title and publish timestamp out of a post page.
///
/// Title: `og:title` meta content, falling back to the first `h1`.
/// Date: `article:published_time` meta content, taken verbatim.
pub fn extract(html: &str) -> PostMeta {
    let document = Html::parse_document(html);
    let og_title = Selector::parse(r#"meta[property="og:title"]"#).unwrap();
    let published = Selector::parse(r#"meta[property="article:published_time"]"#).unwrap();
    let h1 = Selector::parse("h1").unwrap();

    let title = document
        .select(&og_title)
        .find_map(|el| el.value().attr("content"))
        .map(normalize)
        .filter(|t| !t.is_empty())
        .or_else(|| {
            document
                .select(&h1)
                .map(|el| normalize(&el.text().collect::<Vec<_>>().join(" ")))
                .find(|t| !t.is_empty())
        });

    let date = document
        .select(&published)
        .find_map(|el| el.value().attr("content"))
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    PostMeta { title, date }
}

/// Read a `/YYYY/MM/DD/` segment out of a permalink as an ISO date.
pub fn date_from_url(url: &str) -> Option<String> {
    URL_DATE_RE
        .captures(url)
        .map(|c| format!("{}-{}-{}", &c[1], &c[2], &c[3]))
}

/// Fetch the post page behind `item.url` and upgrade its title and date
/// in place. Network or parse trouble leaves the item as it was.
pub async fn hydrate<T: Transport>(transport: &T, item: &mut NewsItem) {
    match transport.fetch_text(&item.url, Accept::Html).await {
        Ok(html) => {
            let meta = extract(&html);
            if let Some(title) = meta.title {
                item.title = title;
            }
            if let Some(date) = meta.date {
                item.date = date;
            }
            debug!(url = %item.url, "Hydrated post metadata");
        }
        Err(e) => {
            warn!(url = %item.url, error = %e, "Post page fetch failed; keeping listing fields");
        }
    }
    if item.date.is_empty() {
        if let Some(date) = date_from_url(&item.url) {
            item.date = date;
        }
    }
}
