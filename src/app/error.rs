use thiserror::Error;

use crate::config::ConfigError;
use crate::orchestrator::ScrapeReport;

#[derive(Error, Debug)]
pub enum JobScoutError {
    #[error("Unknown site: {0}")]
    UnknownSite(String),

    #[error("Invalid site configuration for {id}: {reason}")]
    InvalidSite { id: String, reason: String },

    #[error("No sources are enabled")]
    NoEnabledSources,

    #[error("No jobs found: every source failed or ran out of results")]
    NoResults(Box<ScrapeReport>),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, JobScoutError>;
