//! HTTP transport with a fixed browser-like identity.
//!
//! The upstream site rejects obviously-scripted clients, so every request
//! goes out with the same desktop User-Agent and language headers the
//! consuming site's readers would send. The [`Transport`] trait is the seam
//! between the acquisition strategies and the network: production code uses
//! [`HttpTransport`], tests script responses in memory.
//!
//! A fetch either yields the decoded body as text or fails with
//! [`FetchError::Transport`] (network error, timeout, non-2xx). The body is
//! returned whatever its declared content type; callers validate at parse
//! time.

use crate::errors::FetchError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
const ACCEPT_LANG: &str = "es-CL,es;q=0.9,en;q=0.8";

/// Per-request `Accept` header, depending on what the caller will parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    Json,
    Html,
}

impl Accept {
    fn header_value(self) -> &'static str {
        match self {
            Accept::Json => "application/json,text/plain,*/*",
            Accept::Html => "text/html,application/xhtml+xml,*/*",
        }
    }
}

/// One HTTP GET returning decoded text.
pub trait Transport {
    async fn fetch_text(&self, url: &str, accept: Accept) -> Result<String, FetchError>;
}

/// Production transport over a shared `reqwest::Client`.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANG));
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::transport("(client setup)", e))?;

        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch_text(&self, url: &str, accept: Accept) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept.header_value())
            .send()
            .await
            .map_err(|e| FetchError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Upstream returned non-success status");
            return Err(FetchError::transport(url, format!("http status {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(url, e))?;
        debug!(bytes = body.len(), "Fetched body");
        Ok(body)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory transport scripted per URL, recording every call so tests
    //! can assert which strategies actually hit the network.

    use super::{Accept, Transport};
    use crate::errors::FetchError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    pub(crate) struct ScriptedTransport {
        responses: HashMap<String, Result<String, String>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new() -> Self {
            ScriptedTransport {
                responses: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn ok(mut self, url: &str, body: &str) -> Self {
            self.responses.insert(url.to_string(), Ok(body.to_string()));
            self
        }

        pub(crate) fn fail(mut self, url: &str, reason: &str) -> Self {
            self.responses
                .insert(url.to_string(), Err(reason.to_string()));
            self
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl Transport for ScriptedTransport {
        async fn fetch_text(&self, url: &str, _accept: Accept) -> Result<String, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            match self.responses.get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(reason)) => Err(FetchError::transport(url, reason)),
                None => Err(FetchError::transport(url, "no scripted response")),
            }
        }
    }
}
