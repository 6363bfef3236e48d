//! Remote-content rendering for documentation pages.
//!
//! Some pages embed content that lives elsewhere: Markdown fragments
//! (`BEGIN_INCLUDE_FILE`) and Jupyter notebooks (`BEGIN_NOTEBOOK`). This crate
//! fetches every directive URL first and only then splices the results into the
//! page, so that the text handed to segmentation is complete and final.

pub mod directive;
pub mod include;
pub mod notebook;

use std::collections::HashMap;
use std::time::Duration;

use mxdocs_shared::{MxDocsError, Result};
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

pub use directive::{Directive, DirectiveKind, directive_urls, parse_directive};
pub use include::splice_includes;
pub use notebook::{Cell, CellSource, Notebook, render_notebook, splice_notebooks};

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// Default timeout in seconds for remote fetches.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum response size we accept (10 MB).
const MAX_RESPONSE_SIZE: u64 = 10 * 1024 * 1024;

/// User-Agent string for fetch requests.
const USER_AGENT: &str = concat!("mxdocs/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// Configuration for remote fetches.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Timeout for HTTP requests in seconds.
    pub timeout_secs: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// HTTP client for directive payloads. No retries, no auth.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(opts: &FetchOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| MxDocsError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch `url` as UTF-8 text.
    pub async fn fetch_text(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| MxDocsError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MxDocsError::Network(format!("{url}: HTTP {status}")));
        }

        if let Some(len) = response.content_length() {
            if len > MAX_RESPONSE_SIZE {
                return Err(MxDocsError::validation(format!(
                    "{url}: response too large ({len} bytes, max {MAX_RESPONSE_SIZE})"
                )));
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| MxDocsError::Network(format!("{url}: failed to read body: {e}")))?;

        debug!(%url, len = body.len(), "fetched");
        Ok(body)
    }

    /// Fetch and decode a notebook.
    pub async fn fetch_notebook(&self, url: &Url) -> Result<Notebook> {
        let body = self.fetch_text(url).await?;
        serde_json::from_str(&body)
            .map_err(|e| MxDocsError::parse(format!("{url}: invalid notebook JSON: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Fetch-then-splice entry points
// ---------------------------------------------------------------------------

/// Fetch every include in `text`, then splice them in.
#[instrument(skip_all)]
pub async fn render_includes(text: &str, fetcher: &Fetcher) -> Result<String> {
    let mut fetched: HashMap<Url, String> = HashMap::new();

    for url in directive_urls(text, DirectiveKind::IncludeFile)? {
        if !fetched.contains_key(&url) {
            let body = fetcher.fetch_text(&url).await?;
            fetched.insert(url, body);
        }
    }

    info!(includes = fetched.len(), "includes fetched");
    splice_includes(text, &fetched)
}

/// Fetch every notebook in `text`, then render and splice them in.
#[instrument(skip_all)]
pub async fn render_notebooks(text: &str, fetcher: &Fetcher, docs_url_root: &str) -> Result<String> {
    let mut fetched: HashMap<Url, Notebook> = HashMap::new();

    for url in directive_urls(text, DirectiveKind::Notebook)? {
        if !fetched.contains_key(&url) {
            let notebook = fetcher.fetch_notebook(&url).await?;
            fetched.insert(url, notebook);
        }
    }

    info!(notebooks = fetched.len(), "notebooks fetched");
    splice_notebooks(text, &fetched, docs_url_root)
}
