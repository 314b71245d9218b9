//! Raw URL scan strategy.
//!
//! The last line of defense: assume nothing about the markup, only that
//! the site keeps its date-segmented permalink shape
//! (`https://{host}/YYYY/MM/DD/slug/`). The listing page and a bounded run
//! of `/page/N/` continuations are scanned as plain text; distinct post
//! URLs accumulate in discovery order and the walk stops early as soon as
//! a page contributes nothing new.
//!
//! Anchor text is used for titles when an anchor wraps a matching URL;
//! otherwise the post page metadata (when enabled) or the URL itself has
//! to do.

use crate::config::FetchConfig;
use crate::errors::FetchError;
use crate::models::{collect_items, Mode, NewsItem, ResultSet};
use crate::scrapers::{normalize_link, post_meta, ANCHOR_RE};
use crate::text::normalize;
use crate::transport::{Accept, Transport};
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Dated-permalink matcher for the configured site, `www.` optional.
fn post_url_regex(cfg: &FetchConfig) -> Regex {
    let host = cfg.site_host();
    let bare = host.strip_prefix("www.").unwrap_or(&host);
    Regex::new(&format!(
        r#"https?://(?:www\.)?{}/\d{{4}}/\d{{2}}/\d{{2}}/[^\s"'<>()]+"#,
        regex::escape(bare)
    ))
    .unwrap()
}

/// Scan listing pages for dated post URLs.
#[instrument(level = "info", skip_all, fields(slug = %cfg.tag_slug))]
pub async fn produce<T: Transport>(
    cfg: &FetchConfig,
    transport: &T,
) -> Result<ResultSet, FetchError> {
    let post_url = post_url_regex(cfg);
    let mut urls: Vec<String> = Vec::new();
    let mut titles: HashMap<String, String> = HashMap::new();

    let mut page = 1;
    while page <= cfg.page_cap {
        let page_url = cfg.listing_page_url(page);
        let html = match transport.fetch_text(&page_url, Accept::Html).await {
            Ok(html) => html,
            // Without even a first page there is nothing to scan.
            Err(e) if page == 1 => return Err(e),
            Err(e) => {
                debug!(page, error = %e, "Continuation page unavailable; stopping walk");
                break;
            }
        };

        let before = urls.len();
        for m in post_url.find_iter(&html) {
            let url = m.as_str().to_string();
            if !urls.contains(&url) {
                urls.push(url);
            }
        }

        for caps in ANCHOR_RE.captures_iter(&html) {
            let link = normalize_link(&caps[1], &cfg.site);
            if post_url.is_match(&link) {
                let text = normalize(&caps[2]);
                if !text.is_empty() {
                    titles.entry(link).or_insert(text);
                }
            }
        }

        debug!(page, new = urls.len() - before, total = urls.len(), "Scanned listing page");
        if urls.len() == before {
            break;
        }
        if urls.len() >= cfg.limit {
            break;
        }
        page += 1;
    }

    let mut items = collect_items(
        urls.into_iter().map(|url| NewsItem {
            title: titles.get(&url).cloned().unwrap_or_else(|| url.clone()),
            date: post_meta::date_from_url(&url).unwrap_or_default(),
            url,
            excerpt: String::new(),
        }),
        cfg.limit,
    );

    if cfg.post_meta {
        for item in &mut items {
            post_meta::hydrate(transport, item).await;
        }
    }

    info!(count = items.len(), "URL scan produced items");
    Ok(ResultSet::new(cfg.listing_url(), Mode::PatternFallback, items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::transport::testing::ScriptedTransport;

    const PAGE1: &str = "https://www.epicentrochile.com/tag/olmue2026/";
    const PAGE2: &str = "https://www.epicentrochile.com/tag/olmue2026/page/2/";
    const PAGE3: &str = "https://www.epicentrochile.com/tag/olmue2026/page/3/";

    #[test]
    fn test_post_url_regex_shape() {
        let re = post_url_regex(&test_config());
        assert!(re.is_match("https://www.epicentrochile.com/2025/12/22/nota-del-dia/"));
        assert!(re.is_match("http://epicentrochile.com/2025/01/02/nota/"));
        assert!(!re.is_match("https://www.epicentrochile.com/tag/olmue2026/"));
        assert!(!re.is_match("https://otromedio.cl/2025/12/22/nota/"));
    }

    #[tokio::test]
    async fn test_scan_with_anchor_titles() {
        let html = r#"
            <a href="https://www.epicentrochile.com/2025/12/22/uno/">Nota uno</a>
            texto suelto https://www.epicentrochile.com/2025/12/21/dos/ m&aacute;s texto
        "#;
        let transport = ScriptedTransport::new()
            .ok(PAGE1, html)
            .ok(PAGE2, "")
            .ok(PAGE3, "");

        let result = produce(&test_config(), &transport).await.unwrap();
        assert_eq!(result.mode, Mode::PatternFallback);
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].title, "Nota uno");
        assert_eq!(result.items[0].date, "2025-12-22");
        // No anchor wrapped the second URL, so the URL stands in as title.
        assert_eq!(
            result.items[1].title,
            "https://www.epicentrochile.com/2025/12/21/dos/"
        );
    }

    #[tokio::test]
    async fn test_pagination_stops_on_repeat_page() {
        let page1 = r#"<a href="https://www.epicentrochile.com/2025/12/22/uno/">Uno</a>"#;
        let page2 = r#"<a href="https://www.epicentrochile.com/2025/12/21/dos/">Dos</a>"#;
        // Page 3 repeats page 2 verbatim: no new URLs, the walk must stop.
        let transport = ScriptedTransport::new()
            .ok(PAGE1, page1)
            .ok(PAGE2, page2)
            .ok(PAGE3, page2);

        let mut cfg = test_config();
        cfg.page_cap = 5;
        let result = produce(&cfg, &transport).await.unwrap();

        assert_eq!(result.items.len(), 2);
        assert_eq!(
            transport.calls(),
            vec![PAGE1.to_string(), PAGE2.to_string(), PAGE3.to_string()]
        );
    }

    #[tokio::test]
    async fn test_pagination_stays_within_page_cap() {
        let transport = ScriptedTransport::new()
            .ok(PAGE1, r#"<a href="https://www.epicentrochile.com/2025/12/22/uno/">Uno</a>"#)
            .ok(PAGE2, r#"<a href="https://www.epicentrochile.com/2025/12/21/dos/">Dos</a>"#);

        let mut cfg = test_config();
        cfg.page_cap = 2;
        let result = produce(&cfg, &transport).await.unwrap();

        assert_eq!(result.items.len(), 2);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_first_page_failure_is_terminal() {
        let transport = ScriptedTransport::new();
        let err = produce(&test_config(), &transport).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_continuation_failure_keeps_first_page_results() {
        let transport = ScriptedTransport::new().ok(
            PAGE1,
            r#"<a href="https://www.epicentrochile.com/2025/12/22/uno/">Uno</a>"#,
        );

        let result = produce(&test_config(), &transport).await.unwrap();
        assert_eq!(result.items.len(), 1);
    }
}
