//! # Epicentro News
//!
//! Mirrors the latest posts carrying one tag on a WordPress news site into
//! a single JSON file consumed by a static minisite. The upstream site is
//! not ours: its REST API comes and goes behind rate limits and bot
//! blocking, and its theme markup changes without notice. The fetcher
//! therefore acquires the same logical result through a chain of
//! progressively more permissive strategies and keeps one hard guarantee:
//! **a valid JSON artifact is written on every run**, even when everything
//! upstream is on fire.
//!
//! ## Usage
//!
//! ```sh
//! epicentro_news                       # production defaults
//! epicentro_news --tag-slug vina2026   # follow another tag
//! ```
//!
//! ## Architecture
//!
//! One run is a straight line:
//! 1. **Acquire**: try the REST API, then the tag listing page, then a raw
//!    URL scan — first strategy with items wins ([`pipeline`]).
//! 2. **Persist**: write the result set as indented JSON, creating the
//!    output directory if needed ([`output`]).
//!
//! Failure to acquire news is data (`mode = error` in the artifact), not a
//! process failure. Only failing to write the artifact — after one final
//! minimal attempt — exits non-zero.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod errors;
mod models;
mod output;
mod pipeline;
mod scrapers;
mod text;
mod transport;

use cli::Cli;
use pipeline::Pipeline;
use transport::HttpTransport;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news fetch starting up");

    let cfg = Cli::parse().into_config();
    info!(site = %cfg.site, slug = %cfg.tag_slug, out = %cfg.out_file.display(), "Configured run");

    // A transport that cannot even be built goes straight to the fatal
    // write: the artifact must exist either way.
    let result = match HttpTransport::new(cfg.timeout) {
        Ok(transport) => Pipeline::new(&cfg, &transport).run().await,
        Err(e) => {
            error!(error = %e, "HTTP client setup failed");
            return finish_fatal(&cfg, &e.to_string(), start_time).await;
        }
    };

    if let Err(e) = output::write_result(&result, &cfg.out_file).await {
        error!(error = %e, "Failed to write artifact; attempting minimal fatal write");
        return finish_fatal(&cfg, &e.to_string(), start_time).await;
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, mode = ?result.mode, items = result.items.len(), "Execution complete");
    ExitCode::SUCCESS
}

/// Terminal fallback: one attempt at a minimal diagnostic artifact. If
/// even that fails, surface the failure to the invoking scheduler — the
/// only case where this process exits non-zero.
async fn finish_fatal(
    cfg: &config::FetchConfig,
    reason: &str,
    start_time: std::time::Instant,
) -> ExitCode {
    match output::write_fatal(&cfg.out_file, &cfg.listing_url(), reason).await {
        Ok(()) => {
            info!(elapsed = ?start_time.elapsed(), "Wrote fatal-error artifact");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Fatal write failed; giving up");
            ExitCode::FAILURE
        }
    }
}
