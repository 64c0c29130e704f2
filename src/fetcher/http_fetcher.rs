use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use tokio::sync::Semaphore;
use url::Url;

use crate::app::Result;
use crate::fetcher::config::HttpConfig;
use crate::fetcher::{FetchFailure, FetchResult, Fetcher};

/// reqwest-backed fetcher sharing one bounded connection pool across sites.
///
/// reqwest only bounds idle connections, so in-flight requests are capped
/// with a global semaphore and one semaphore per host.
pub struct HttpFetcher {
    client: Client,
    total: Arc<Semaphore>,
    per_host: Mutex<HashMap<String, Arc<Semaphore>>>,
    per_host_limit: usize,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .timeout(config.total_timeout())
            .pool_idle_timeout(config.keepalive())
            .pool_max_idle_per_host(config.max_connections_per_host)
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            total: Arc::new(Semaphore::new(config.max_connections.max(1))),
            per_host: Mutex::new(HashMap::new()),
            per_host_limit: config.max_connections_per_host.max(1),
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(&HttpConfig::default())
    }

    fn host_semaphore(&self, host: &str) -> Arc<Semaphore> {
        let mut per_host = self.per_host.lock().unwrap_or_else(|e| e.into_inner());
        per_host
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.per_host_limit)))
            .clone()
    }

    async fn get(&self, url: &str) -> FetchResult {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return FetchResult::Failed(classify(e)),
        };

        let status = response.status();
        if !status.is_success() {
            return FetchResult::Failed(FetchFailure::Status(status.as_u16()));
        }

        match response.text().await {
            Ok(body) => FetchResult::Content { body },
            Err(e) => FetchResult::Failed(classify(e)),
        }
    }
}

fn classify(e: reqwest::Error) -> FetchFailure {
    if e.is_timeout() {
        FetchFailure::Timeout
    } else {
        FetchFailure::Network(e.to_string())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let host = match Url::parse(url) {
            Ok(parsed) => parsed.host_str().unwrap_or_default().to_string(),
            Err(e) => return FetchResult::Failed(FetchFailure::Network(format!("invalid URL {}: {}", url, e))),
        };

        let host_semaphore = self.host_semaphore(&host);
        let Ok(_host_permit) = host_semaphore.acquire().await else {
            return FetchResult::Failed(FetchFailure::Network("connection pool closed".into()));
        };
        let Ok(_permit) = self.total.acquire().await else {
            return FetchResult::Failed(FetchFailure::Network("connection pool closed".into()));
        };

        self.get(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_defaults() {
        let fetcher = HttpFetcher::with_defaults().unwrap();
        assert_eq!(fetcher.total.available_permits(), 50);
        assert_eq!(fetcher.per_host_limit, 10);
    }

    #[test]
    fn test_zero_limits_are_clamped() {
        let config = HttpConfig {
            max_connections: 0,
            max_connections_per_host: 0,
            ..Default::default()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        assert_eq!(fetcher.total.available_permits(), 1);
        assert_eq!(fetcher.per_host_limit, 1);
    }

    #[test]
    fn test_host_semaphore_is_shared_per_host() {
        let fetcher = HttpFetcher::with_defaults().unwrap();
        let a = fetcher.host_semaphore("a.example");
        let b = fetcher.host_semaphore("a.example");
        let c = fetcher.host_semaphore("c.example");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[tokio::test]
    async fn test_invalid_url_is_soft_failure() {
        let fetcher = HttpFetcher::with_defaults().unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, FetchResult::Failed(FetchFailure::Network(_))));
    }
}
