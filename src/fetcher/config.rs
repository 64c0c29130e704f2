use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Settings for the shared HTTP connection pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User agent sent with every request
    pub user_agent: String,

    /// TCP/TLS connect timeout in seconds (default: 10)
    pub connect_timeout_secs: u64,

    /// Per-read timeout in seconds (default: 15)
    pub read_timeout_secs: u64,

    /// Whole-request timeout in seconds (default: 30)
    pub total_timeout_secs: u64,

    /// Cap on concurrent connections across all sites (default: 50)
    pub max_connections: usize,

    /// Cap on concurrent connections to one host (default: 10)
    pub max_connections_per_host: usize,

    /// How long idle pooled connections are kept in seconds (default: 30)
    pub keepalive_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout_secs: 10,
            read_timeout_secs: 15,
            total_timeout_secs: 30,
            max_connections: 50,
            max_connections_per_host: 10,
            keepalive_secs: 30,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn total_timeout(&self) -> Duration {
        Duration::from_secs(self.total_timeout_secs)
    }

    pub fn keepalive(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }
}

/// Settings for the headless browser used by `browser` fetch-mode sites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Launch a browser at startup (default: false)
    pub enabled: bool,

    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Page load timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Wait time after page load for dynamic content in milliseconds (default: 1000)
    pub wait_after_load_ms: u64,

    /// Maximum concurrent browser pages (default: 3)
    pub max_concurrency: usize,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            headless: true,
            timeout_secs: 30,
            wait_after_load_ms: 1000,
            max_concurrency: 3,
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
        }
    }
}

impl RenderConfig {
    /// Get the page load timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the wait time after load as a Duration
    pub fn wait_after_load(&self) -> Duration {
        Duration::from_millis(self.wait_after_load_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_http_config_values() {
        let config = HttpConfig::default();
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.read_timeout(), Duration::from_secs(15));
        assert_eq!(config.total_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_connections, 50);
        assert_eq!(config.max_connections_per_host, 10);
        assert_eq!(config.keepalive(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_render_config_values() {
        let config = RenderConfig::default();
        assert!(!config.enabled);
        assert!(config.headless);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.wait_after_load(), Duration::from_millis(1000));
        assert_eq!(config.max_concurrency, 3);
        assert!(config.user_agent.is_some());
    }

    #[test]
    fn test_partial_http_config() {
        let config: HttpConfig = toml::from_str("max_connections = 4").unwrap();
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.max_connections_per_host, 10);
    }
}
