use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How pages for a site are retrieved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Plain HTTP request through the shared connection pool
    #[default]
    Http,
    /// Headless browser render, for sites that build their listing with JavaScript
    Browser,
}

/// CSS selectors used to pull job fields out of a results page.
///
/// Every field other than `container` is matched inside one container.
/// Comma-separated alternatives are allowed (`".job-title, h3 a"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorMap {
    pub container: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub date_posted: Option<String>,
}

/// Declarative description of one listing site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub id: String,
    pub name: String,
    pub base_url: String,
    /// Search URL with `{query}`, `{location}` and either `{start}` (result
    /// offset) or `{page}` (1-based page number) placeholders
    pub search_url: String,
    pub selectors: SelectorMap,
    /// Minimum seconds between two requests to this site
    #[serde(default = "default_rate_limit")]
    pub rate_limit_secs: f64,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    /// Results per page, used to compute `{start}` offsets
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub fetch_mode: FetchMode,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_rate_limit() -> f64 {
    2.0
}

fn default_max_pages() -> usize {
    5
}

fn default_page_size() -> usize {
    10
}

fn default_enabled() -> bool {
    true
}

impl SiteConfig {
    /// Get the rate limit as a Duration. Negative or non-finite values mean no delay.
    pub fn rate_limit(&self) -> Duration {
        if self.rate_limit_secs.is_finite() && self.rate_limit_secs > 0.0 {
            Duration::from_secs_f64(self.rate_limit_secs)
        } else {
            Duration::ZERO
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
