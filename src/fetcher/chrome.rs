use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::sync::Semaphore;

use crate::app::{JobScoutError, Result};
use crate::fetcher::config::RenderConfig;
use crate::fetcher::{FetchFailure, FetchResult, Fetcher};

/// Fetcher that renders pages in headless Chrome via chromiumoxide, for
/// listing sites that build their results with JavaScript.
pub struct ChromeFetcher {
    browser: Arc<Browser>,
    config: RenderConfig,
    semaphore: Arc<Semaphore>,
}

impl ChromeFetcher {
    /// Launch a browser with the given configuration
    pub async fn new(config: RenderConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--window-size=1920,1080");

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| JobScoutError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            JobScoutError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        let semaphore = Arc::new(Semaphore::new(config.max_concurrency.max(1)));

        Ok(Self {
            browser: Arc::new(browser),
            config,
            semaphore,
        })
    }

    async fn render(&self, url: &str) -> std::result::Result<String, FetchFailure> {
        let rendering = |stage: &str, e: &dyn std::fmt::Display| {
            FetchFailure::Rendering(format!("{}: {}", stage, e))
        };

        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| rendering("failed to create page", &e))?;

        if let Some(ref ua) = self.config.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| rendering("failed to set user agent", &e))?;
        }

        let loaded = async {
            page.wait_for_navigation()
                .await
                .map_err(|e| rendering("navigation failed", &e))?;

            tokio::time::sleep(self.config.wait_after_load()).await;

            page.content()
                .await
                .map_err(|e| rendering("failed to read content", &e))
        };

        let content = match tokio::time::timeout(self.config.timeout(), loaded).await {
            Ok(content) => content,
            Err(_) => Err(FetchFailure::Timeout),
        };

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close page for {}: {}", url, e);
        }

        content
    }
}

#[async_trait]
impl Fetcher for ChromeFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let Ok(_permit) = self.semaphore.acquire().await else {
            return FetchResult::Failed(FetchFailure::Rendering("browser pool closed".into()));
        };

        match self.render(url).await {
            Ok(body) if !body.trim().is_empty() => FetchResult::Content { body },
            Ok(_) => FetchResult::Failed(FetchFailure::Rendering("no content rendered".into())),
            Err(failure) => FetchResult::Failed(failure),
        }
    }
}
