//! Tag listing page strategy.
//!
//! Used when the REST API is blocked or empty but the listing page still
//! renders. Two parses are tried against the fetched HTML:
//!
//! 1. **Structured**: post titles live in anchors inside `h2`/`h3`
//!    headings; some themes instead render each post as a list item whose
//!    leading anchor is the title and whose trailing text carries a
//!    long-form Spanish date and the excerpt.
//! 2. **Flat**: if the structured parse finds nothing (theme change,
//!    mangled markup), every anchor in the raw HTML is considered and
//!    filtered down to on-site post links.
//!
//! Either way the result is deduplicated, capped, and optionally enriched
//! from the post pages themselves.

use crate::config::FetchConfig;
use crate::errors::FetchError;
use crate::models::{collect_items, Mode, NewsItem, ResultSet};
use crate::scrapers::{keep_link, normalize_link, post_meta, ANCHOR_RE};
use crate::text::normalize;
use crate::transport::{Accept, Transport};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

/// Long-form Spanish date as the site prints it under listing entries:
/// weekday, day number, month, year, with the connecting "de" optional in
/// both positions.
static ES_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:lunes|martes|mi[eé]rcoles|jueves|viernes|s[áa]bado|domingo)\s+\d{1,2}(?:\s+de)?\s+(?:enero|febrero|marzo|abril|mayo|junio|julio|agosto|septiembre|octubre|noviembre|diciembre)(?:\s+de)?\s+\d{4}\b",
    )
    .unwrap()
});

/// Split listing-entry tail text into (date, excerpt) around the first
/// long-form date. No date means the whole tail is excerpt.
pub(crate) fn split_date_excerpt(text: &str) -> (String, String) {
    match ES_DATE_RE.find(text) {
        Some(m) => (
            m.as_str().to_string(),
            text[m.end()..].trim().to_string(),
        ),
        None => (String::new(), text.trim().to_string()),
    }
}

/// First anchor inside each `h2`/`h3`, in document order.
fn heading_items(document: &Html, cfg: &FetchConfig) -> Vec<NewsItem> {
    let headings = Selector::parse("h2, h3").unwrap();
    let anchors = Selector::parse("a[href]").unwrap();

    let mut items = Vec::new();
    for heading in document.select(&headings) {
        let Some(anchor) = heading.select(&anchors).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let title = normalize(&anchor.text().collect::<Vec<_>>().join(" "));
        if title.is_empty() || href.trim().is_empty() {
            continue;
        }
        items.push(NewsItem {
            title,
            url: normalize_link(href, &cfg.site),
            date: String::new(),
            excerpt: String::new(),
        });
    }
    items
}

/// List entries whose leading element is an anchor: the anchor is the
/// title, the trailing text splits into date and excerpt.
fn list_entry_items(document: &Html, cfg: &FetchConfig) -> Vec<NewsItem> {
    let list_entries = Selector::parse("li").unwrap();

    let mut items = Vec::new();
    for entry in document.select(&list_entries) {
        let Some(first) = entry.children().filter_map(ElementRef::wrap).next() else {
            continue;
        };
        if first.value().name() != "a" {
            continue;
        }
        let Some(href) = first.value().attr("href") else {
            continue;
        };
        let title = normalize(&first.text().collect::<Vec<_>>().join(" "));
        if title.is_empty() || href.trim().is_empty() {
            continue;
        }

        let full_text = normalize(&entry.text().collect::<Vec<_>>().join(" "));
        let tail = full_text
            .strip_prefix(title.as_str())
            .unwrap_or("")
            .trim()
            .to_string();
        let (date, excerpt) = split_date_excerpt(&tail);

        items.push(NewsItem {
            title,
            url: normalize_link(href, &cfg.site),
            date,
            excerpt,
        });
    }
    items
}

/// Last resort inside this strategy: pair every raw anchor with its text.
fn flat_anchor_items(html: &str, cfg: &FetchConfig) -> Vec<NewsItem> {
    ANCHOR_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let url = normalize_link(&caps[1], &cfg.site);
            let title = normalize(&caps[2]);
            (!title.is_empty()).then_some(NewsItem {
                title,
                url,
                date: String::new(),
                excerpt: String::new(),
            })
        })
        .collect()
}

/// Scrape the tag listing page for post links.
#[instrument(level = "info", skip_all, fields(slug = %cfg.tag_slug))]
pub async fn produce<T: Transport>(
    cfg: &FetchConfig,
    transport: &T,
) -> Result<ResultSet, FetchError> {
    let listing_url = cfg.listing_url();
    let html = transport.fetch_text(&listing_url, Accept::Html).await?;

    // The parsed document is dropped before any further await.
    let mut found = {
        let document = Html::parse_document(&html);
        let mut found = heading_items(&document, cfg);
        found.extend(list_entry_items(&document, cfg));
        found
    };
    found.retain(|item| keep_link(&item.url, cfg));
    debug!(count = found.len(), "Structured parse of listing page");

    if found.is_empty() {
        found = flat_anchor_items(&html, cfg);
        found.retain(|item| keep_link(&item.url, cfg));
        debug!(count = found.len(), "Flat anchor parse of listing page");
    }

    let mut items = collect_items(found, cfg.limit);
    if cfg.post_meta {
        for item in &mut items {
            post_meta::hydrate(transport, item).await;
        }
    }

    info!(count = items.len(), "Listing page produced items");
    Ok(ResultSet::new(listing_url, Mode::HtmlFallback, items))
}
