//! Acquisition strategies for the tagged news feed.
//!
//! All three strategies answer the same question — which posts carry the
//! configured tag right now? — against progressively weaker upstream
//! guarantees. The pipeline tries them in table order and keeps the first
//! non-empty answer.
//!
//! | Strategy | Module | Method | Survives |
//! |----------|--------|--------|----------|
//! | REST API | [`wp_api`] | `wp-json/wp/v2` tag + post queries | API reachable and not blocked |
//! | Listing page | [`tag_page`] | `scraper` over the tag page HTML | Known theme markup |
//! | URL scan | [`url_scan`] | regex over raw listing text | Only the permalink shape |
//!
//! # Common patterns
//!
//! Each module exports one entry point with the same shape:
//!
//! ```ignore
//! pub async fn produce<T: Transport>(cfg: &FetchConfig, transport: &T)
//!     -> Result<ResultSet, FetchError>
//! ```
//!
//! so strategies can be added or reordered without touching each other.
//! All of them:
//! - fetch through [`crate::transport::Transport`] only,
//! - normalize text with [`crate::text::normalize`],
//! - funnel items through [`crate::models::collect_items`] (non-empty
//!   title/url, URL dedup, limit cap),
//! - treat zero items as a valid, empty answer — the pipeline decides
//!   whether that means falling through.
//!
//! [`post_meta`] is not a strategy; it is the shared per-post metadata
//! recovery (canonical title, publish date) the two HTML strategies use.

pub mod post_meta;
pub mod tag_page;
pub mod url_scan;
pub mod wp_api;

use crate::config::FetchConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Flat anchor matcher for the pattern passes. Case-insensitive,
/// dot-matches-newline so multi-line anchor bodies still pair up.
pub(crate) static ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<a[^>]+href="([^"]+)"[^>]*>(.*?)</a>"#).unwrap());

/// Promote protocol-relative links to https and root-relative links to the
/// site origin; absolute links pass through unchanged.
pub(crate) fn normalize_link(href: &str, site: &str) -> String {
    let href = href.trim();
    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{rest}");
    }
    if href.starts_with('/') {
        return format!("{}{}", site.trim_end_matches('/'), href);
    }
    href.to_string()
}

/// A normalized link is worth keeping when it points at the site itself
/// and is not the tag listing (or one of its pagination pages).
pub(crate) fn keep_link(link: &str, cfg: &FetchConfig) -> bool {
    let host = cfg.site_host();
    let bare = host.strip_prefix("www.").unwrap_or(&host).to_string();
    let on_site = Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .is_some_and(|h| h == host || h == bare || h.ends_with(&format!(".{bare}")));
    on_site && !link.contains(&format!("/tag/{}/", cfg.tag_slug))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_normalize_link() {
        let site = "https://site.com";
        assert_eq!(normalize_link("//x.com/p", site), "https://x.com/p");
        assert_eq!(normalize_link("/p", site), "https://site.com/p");
        assert_eq!(normalize_link("https://x.com/p", site), "https://x.com/p");
        assert_eq!(normalize_link("  /p  ", site), "https://site.com/p");
    }

    #[test]
    fn test_keep_link_requires_site_host() {
        let cfg = test_config();
        assert!(keep_link(
            "https://www.epicentrochile.com/2025/12/22/nota/",
            &cfg
        ));
        assert!(keep_link("https://epicentrochile.com/2025/12/22/nota/", &cfg));
        assert!(!keep_link("https://otromedio.cl/2025/12/22/nota/", &cfg));
        assert!(!keep_link("nota-relativa", &cfg));
    }

    #[test]
    fn test_keep_link_excludes_listing_and_its_pages() {
        let cfg = test_config();
        assert!(!keep_link("https://www.epicentrochile.com/tag/olmue2026/", &cfg));
        assert!(!keep_link(
            "https://www.epicentrochile.com/tag/olmue2026/page/2/",
            &cfg
        ));
    }
}
