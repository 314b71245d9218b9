//! Immutable run configuration.
//!
//! One [`FetchConfig`] value is built from the CLI at startup and passed by
//! reference into every strategy. Nothing in the pipeline reads global
//! state.

use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Everything a single run needs to know: the site, the topic, the output
/// artifact, and the bounds that keep the run finite.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Site origin, without a trailing slash, e.g. `https://www.epicentrochile.com`.
    pub site: String,
    /// Topic tag slug, e.g. `olmue2026`.
    pub tag_slug: String,
    /// Path of the JSON artifact to (over)write.
    pub out_file: PathBuf,
    /// Maximum number of items in the result set.
    pub limit: usize,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Upper bound on `/page/N/` listing pages visited by the URL scan.
    pub page_cap: usize,
    /// Fetch each discovered post page to recover canonical title and date.
    pub post_meta: bool,
}

impl FetchConfig {
    /// Canonical listing URL for the configured tag. Also the `source`
    /// field of every result set, whatever strategy produced it.
    pub fn listing_url(&self) -> String {
        format!("{}/tag/{}/", self.site, self.tag_slug)
    }

    /// Listing URL for page `n` (1-based); page 1 is the plain listing.
    pub fn listing_page_url(&self, n: usize) -> String {
        if n <= 1 {
            self.listing_url()
        } else {
            format!("{}/tag/{}/page/{}/", self.site, self.tag_slug, n)
        }
    }

    /// Host of the site origin, used to keep discovered links on-site.
    /// Falls back to the raw origin string if it does not parse as a URL.
    pub fn site_host(&self) -> String {
        Url::parse(&self.site)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| self.site.clone())
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> FetchConfig {
    FetchConfig {
        site: "https://www.epicentrochile.com".to_string(),
        tag_slug: "olmue2026".to_string(),
        out_file: PathBuf::from("assets/data/noticias.json"),
        limit: 10,
        timeout: Duration::from_secs(40),
        page_cap: 3,
        post_meta: false,
    }
}
