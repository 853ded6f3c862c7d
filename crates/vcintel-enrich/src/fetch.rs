//! Bounded-time page fetching for homepage candidates.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::Client;
use thiserror::Error;
use vcintel_core::{AppConfig, FetchedPage};

use crate::error::EnrichError;
use crate::html::extract_visible_text;

/// Upper bound on extracted characters kept per page.
pub const MAX_PAGE_CHARS: usize = 12_000;

/// Fetches one candidate URL. Every failure is reported as `None`.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Option<FetchedPage>> + Send;
}

/// Why a candidate produced no page. Only used for logging.
#[derive(Debug, Error)]
enum FetchMiss {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("content type {0:?} is not text/html")]
    NotHtml(String),

    #[error("page has no visible text")]
    Empty,
}

/// `reqwest`-backed [`PageFetcher`] with a hard per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    /// Creates a fetcher whose requests give up after `timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, EnrichError> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// # Errors
    ///
    /// See [`HttpPageFetcher::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, EnrichError> {
        Self::new(config.fetch_timeout_secs, &config.fetch_user_agent)
    }

    async fn try_fetch(&self, url: &str) -> Result<FetchedPage, FetchMiss> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "text/html,application/xhtml+xml")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchMiss::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.to_ascii_lowercase().contains("text/html") {
            return Err(FetchMiss::NotHtml(content_type));
        }

        let html = response.text().await?;
        let text = truncate_chars(&extract_visible_text(&html), MAX_PAGE_CHARS);
        if text.is_empty() {
            return Err(FetchMiss::Empty);
        }

        Ok(FetchedPage {
            url: url.to_string(),
            text,
            fetched_at: Utc::now(),
        })
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Option<FetchedPage> {
        match self.try_fetch(url).await {
            Ok(page) => {
                tracing::debug!(url, chars = page.text.chars().count(), "fetched candidate page");
                Some(page)
            }
            Err(miss) => {
                tracing::debug!(url, reason = %miss, "candidate page unavailable");
                None
            }
        }
    }
}

pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
