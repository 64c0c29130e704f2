pub mod chrome;
pub mod config;
pub mod http_fetcher;
pub mod rate_limit;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{FetchMode, SiteConfig};
use rate_limit::RateLimiter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Page retrieved with a 2xx status
    Content { body: String },
    /// Soft failure; ends pagination for the requesting site only
    Failed(FetchFailure),
}

impl FetchResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchResult::Failed(_))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("rendering failed: {0}")]
    Rendering(String),

    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Transport that turns a URL into page content.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Per-site front door to the transports.
///
/// Applies the site's rate limit, then routes the request to the plain HTTP
/// fetcher or the rendering fetcher according to the site's [`FetchMode`].
pub struct SiteFetcher {
    http: Arc<dyn Fetcher + Send + Sync>,
    browser: Option<Arc<dyn Fetcher + Send + Sync>>,
    limiter: RateLimiter,
}

impl SiteFetcher {
    pub fn new(http: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self {
            http,
            browser: None,
            limiter: RateLimiter::new(),
        }
    }

    pub fn with_browser(mut self, browser: Arc<dyn Fetcher + Send + Sync>) -> Self {
        self.browser = Some(browser);
        self
    }

    pub fn has_browser(&self) -> bool {
        self.browser.is_some()
    }

    pub async fn fetch(&self, url: &str, site: &SiteConfig) -> FetchResult {
        let fetcher = match site.fetch_mode {
            FetchMode::Http => &self.http,
            FetchMode::Browser => match self.browser {
                Some(ref browser) => browser,
                None => {
                    return FetchResult::Failed(FetchFailure::Unsupported(format!(
                        "{} needs a rendering fetcher and none is configured",
                        site.id
                    )));
                }
            },
        };

        self.limiter.acquire(&site.id, site.rate_limit()).await;

        let result = fetcher.fetch(url).await;
        match result {
            FetchResult::Content { ref body } => {
                tracing::debug!(site = %site.id, url, bytes = body.len(), "Fetched page");
            }
            FetchResult::Failed(ref failure) => {
                tracing::warn!(site = %site.id, url, "Fetch failed: {}", failure);
            }
        }
        result
    }
}
