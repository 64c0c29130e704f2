//! Configuration management for jobscout.
//!
//! Configuration is read from `~/.config/jobscout/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::JobScoutError;
use crate::domain::SiteConfig;
use crate::fetcher::config::{HttpConfig, RenderConfig};
use crate::registry::SiteRegistry;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub browser: RenderConfig,
    pub search: SearchDefaults,
    /// Built-in or configured site ids to disable at startup
    pub disabled_sites: Vec<String>,
    /// Extra sites; an entry whose id matches a built-in replaces it
    pub sites: Vec<SiteConfig>,
}

/// Defaults applied to searches when the command line doesn't override them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    pub location: String,
    pub per_source_limit: usize,
    pub deadline_secs: Option<u64>,
    pub fail_on_empty: bool,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            location: "South Africa".to_string(),
            per_source_limit: 10,
            deadline_secs: None,
            fail_on_empty: true,
        }
    }
}

impl SearchDefaults {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`.
    ///
    /// If the file doesn't exist, creates a default one with comments.
    /// If the file exists but is invalid, returns an error.
    /// Missing fields use default values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::create_default_config(path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/jobscout/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("jobscout").join("config.toml"))
    }

    /// Build the site registry: built-ins, then configured sites, then disables.
    pub fn build_registry(&self) -> Result<SiteRegistry, JobScoutError> {
        let registry = SiteRegistry::with_builtin_sites();
        for site in &self.sites {
            registry.register(site.clone())?;
        }
        for id in &self.disabled_sites {
            registry.disable(id)?;
        }
        Ok(registry)
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# jobscout configuration

[search]
# Location used when none is given on the command line
location = "South Africa"

# Maximum jobs kept from each site per search
per_source_limit = 10

# Stop fetching after this many seconds and return what was gathered
# deadline_secs = 60

# Report an error when every site failed or returned nothing
fail_on_empty = true

[http]
connect_timeout_secs = 10
read_timeout_secs = 15
total_timeout_secs = 30

# Connection caps shared by all sites
max_connections = 50
max_connections_per_host = 10

keepalive_secs = 30

[browser]
# Launch headless Chrome for sites with fetch_mode = "browser"
enabled = false
headless = true
timeout_secs = 30
wait_after_load_ms = 1000
max_concurrency = 3

# Built-in sites: indeed_za, careers24, pnet, spane4all, linkedin
# (linkedin needs the browser and is disabled; select it with -s linkedin)
disabled_sites = []

# Additional sites. An entry with a built-in id replaces that site.
#
# [[sites]]
# id = "example"
# name = "Example Jobs"
# base_url = "https://jobs.example.com"
# search_url = "https://jobs.example.com/search?q={query}&l={location}&page={page}"
# rate_limit_secs = 2.0
# max_pages = 5
# fetch_mode = "http"
#
# [sites.selectors]
# container = ".job-card"
# title = ".job-title"
# company = ".company"
# location = ".location"
# description = ".summary"
# salary = ".salary"
# link = ".job-title a"
# date_posted = ".posted"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
