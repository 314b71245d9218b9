//! Failure taxonomy for the acquisition pipeline.
//!
//! Every way a strategy can fail maps onto one of four variants, and the
//! pipeline coordinator branches on them: transport, format, and resolution
//! failures are absorbed at the strategy boundary and turned into a
//! fallback decision, while write failures escape all the way to the fatal
//! write path in `main`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while acquiring or persisting the news feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure, timeout, or a non-2xx response.
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The response body could not be parsed in the expected shape,
    /// e.g. an HTML block page where JSON was requested.
    #[error("unexpected response shape from {url}: {detail}")]
    Format { url: String, detail: String },

    /// No tag id could be resolved for the configured slug.
    #[error("no tag found for slug '{slug}'")]
    Resolution { slug: String },

    /// The output artifact could not be persisted.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    pub fn transport(url: impl Into<String>, reason: impl ToString) -> Self {
        FetchError::Transport {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn format(url: impl Into<String>, detail: impl ToString) -> Self {
        FetchError::Format {
            url: url.into(),
            detail: detail.to_string(),
        }
    }
}
