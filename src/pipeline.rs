//! Fallback coordination across the acquisition strategies.
//!
//! The strategies run strictly in order — REST API, listing page, URL
//! scan — and the first one to come back with at least one item wins
//! outright; the rest are never invoked. A strategy that fails *or*
//! answers with zero items just moves the pipeline along, leaving a note
//! behind so the artifact records why the better source was abandoned.
//!
//! `run` cannot fail: when every strategy is exhausted it produces a
//! diagnostic result set (`mode = error`) carrying the last failure and
//! the full abandonment trail. Writing that out is the caller's job and
//! happens unconditionally.

use crate::config::FetchConfig;
use crate::models::{Mode, ResultSet};
use crate::scrapers::{tag_page, url_scan, wp_api};
use crate::transport::Transport;
use tracing::{info, instrument, warn};

pub struct Pipeline<'a, T: Transport> {
    cfg: &'a FetchConfig,
    transport: &'a T,
}

impl<'a, T: Transport> Pipeline<'a, T> {
    pub fn new(cfg: &'a FetchConfig, transport: &'a T) -> Self {
        Pipeline { cfg, transport }
    }

    /// Run the fallback chain to completion and return the single result
    /// set this run will persist.
    #[instrument(level = "info", skip_all)]
    pub async fn run(&self) -> ResultSet {
        let mut notes: Vec<String> = Vec::new();
        let mut last_error: Option<String> = None;

        match wp_api::produce(self.cfg, self.transport).await {
            Ok(result) if !result.items.is_empty() => {
                info!(count = result.items.len(), "wp-json answered; using API result");
                return result;
            }
            Ok(_) => {
                warn!("wp-json returned 0 items; falling back to listing page");
                notes.push("wp-json returned 0 items".to_string());
            }
            Err(e) => {
                warn!(error = %e, "wp-json failed; falling back to listing page");
                notes.push(format!("wp-json failed: {e}"));
                last_error = Some(e.to_string());
            }
        }

        match tag_page::produce(self.cfg, self.transport).await {
            Ok(mut result) if !result.items.is_empty() => {
                info!(count = result.items.len(), "Listing page answered");
                result.note = Some(notes.join("; "));
                return result;
            }
            Ok(_) => {
                warn!("Listing page yielded 0 items; falling back to URL scan");
                notes.push("tag page yielded 0 items".to_string());
            }
            Err(e) => {
                warn!(error = %e, "Listing page failed; falling back to URL scan");
                notes.push(format!("tag page failed: {e}"));
                last_error = Some(e.to_string());
            }
        }

        match url_scan::produce(self.cfg, self.transport).await {
            Ok(mut result) if !result.items.is_empty() => {
                info!(count = result.items.len(), "URL scan answered");
                result.note = Some(notes.join("; "));
                return result;
            }
            Ok(_) => {
                warn!("URL scan yielded 0 items");
                notes.push("url scan yielded 0 items".to_string());
            }
            Err(e) => {
                warn!(error = %e, "URL scan failed");
                notes.push(format!("url scan failed: {e}"));
                last_error = Some(e.to_string());
            }
        }

        warn!("Every strategy failed or came back empty; writing diagnostic result");
        let mut result = ResultSet::new(self.cfg.listing_url(), Mode::Error, Vec::new());
        result.error = last_error;
        result.note = Some(notes.join("; "));
        result
    }
}
