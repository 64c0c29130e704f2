use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::chrome::ChromeFetcher;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::{Fetcher, SiteFetcher};
use crate::orchestrator::Orchestrator;
use crate::registry::SiteRegistry;

pub struct AppContext {
    pub config: Config,
    pub registry: Arc<SiteRegistry>,
    pub orchestrator: Orchestrator,
}

impl AppContext {
    /// Build the registry and fetch stack from `config`.
    ///
    /// A browser is launched only when `[browser] enabled` is set or
    /// `force_browser` is passed.
    pub async fn new(config: Config, force_browser: bool) -> Result<Self> {
        let registry = Arc::new(config.build_registry()?);
        let http: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.http)?);
        let mut fetcher = SiteFetcher::new(http);

        if config.browser.enabled || force_browser {
            let browser: Arc<dyn Fetcher + Send + Sync> =
                Arc::new(ChromeFetcher::new(config.browser.clone()).await?);
            fetcher = fetcher.with_browser(browser);
        }

        let orchestrator = Orchestrator::new(registry.clone(), fetcher);

        Ok(Self {
            config,
            registry,
            orchestrator,
        })
    }

    /// HTTP-only context; sites in browser mode fail softly.
    pub fn http_only(config: Config) -> Result<Self> {
        let registry = Arc::new(config.build_registry()?);
        let http: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.http)?);
        let orchestrator = Orchestrator::new(registry.clone(), SiteFetcher::new(http));

        Ok(Self {
            config,
            registry,
            orchestrator,
        })
    }
}
