//! Command-line interface definitions.
//!
//! Every option has a default matching the production minisite deployment,
//! so the scheduled job can invoke the binary bare and overrides stay
//! available for testing against another site or output location.

use crate::config::FetchConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments for the news feed fetcher.
///
/// # Examples
///
/// ```sh
/// # Production defaults
/// epicentro_news
///
/// # Another tag, shallower scan, custom artifact location
/// epicentro_news --tag-slug vina2026 --page-cap 2 --out /tmp/noticias.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Site origin (scheme + host, no trailing slash)
    #[arg(long, default_value = "https://www.epicentrochile.com")]
    pub site: String,

    /// Topic tag slug to follow
    #[arg(long, default_value = "olmue2026")]
    pub tag_slug: String,

    /// Path of the JSON artifact to write
    #[arg(short, long, default_value = "assets/data/noticias.json")]
    pub out: PathBuf,

    /// Maximum number of news items in the artifact
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 40)]
    pub timeout_secs: u64,

    /// Maximum number of listing pages the URL scan may visit
    #[arg(long, default_value_t = 3)]
    pub page_cap: usize,

    /// Skip fetching each post page for canonical title and publish date
    #[arg(long)]
    pub no_post_meta: bool,
}

impl Cli {
    pub fn into_config(self) -> FetchConfig {
        FetchConfig {
            site: self.site.trim_end_matches('/').to_string(),
            tag_slug: self.tag_slug,
            out_file: self.out,
            limit: self.limit,
            timeout: Duration::from_secs(self.timeout_secs),
            page_cap: self.page_cap,
            post_meta: !self.no_post_meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["epicentro_news"]);
        let cfg = cli.into_config();

        assert_eq!(cfg.site, "https://www.epicentrochile.com");
        assert_eq!(cfg.tag_slug, "olmue2026");
        assert_eq!(cfg.out_file, PathBuf::from("assets/data/noticias.json"));
        assert_eq!(cfg.limit, 10);
        assert_eq!(cfg.timeout, Duration::from_secs(40));
        assert_eq!(cfg.page_cap, 3);
        assert!(cfg.post_meta);
    }

    #[test]
    fn test_overrides_and_origin_trim() {
        let cli = Cli::parse_from([
            "epicentro_news",
            "--site",
            "https://otro.sitio.cl/",
            "--tag-slug",
            "vina2026",
            "-o",
            "/tmp/noticias.json",
            "--limit",
            "5",
            "--no-post-meta",
        ]);
        let cfg = cli.into_config();

        assert_eq!(cfg.site, "https://otro.sitio.cl");
        assert_eq!(cfg.tag_slug, "vina2026");
        assert_eq!(cfg.out_file, PathBuf::from("/tmp/noticias.json"));
        assert_eq!(cfg.limit, 5);
        assert!(!cfg.post_meta);
    }
}
