//! # Jobscout
//!
//! A concurrent job-listing scraper that searches several job boards at
//! once and merges the results.
//!
//! ## Architecture
//!
//! Each search runs one pagination task per site:
//!
//! ```text
//! Registry → Fetcher (rate limit) → Extractor → Deduplicator → merge/sort
//! ```
//!
//! - [`registry`]: Declarative site configurations
//! - [`fetcher`]: Rate-limited HTTP and headless-browser fetching
//! - [`extractor`]: CSS-selector extraction into job records
//! - [`orchestrator`]: Per-site state machines, dedup and merging
//!
//! ## Quick Start
//!
//! ```bash
//! # Search every enabled site
//! jobscout search "python developer" -l "Cape Town"
//!
//! # Search two sites, five jobs each, as JSON
//! jobscout search rust -s pnet -s careers24 -n 5 --json
//!
//! # List registered sites
//! jobscout sites
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the registry,
/// fetch stack and orchestrator.
pub mod app;

/// Command-line interface using clap.
///
/// - `search <query>` - Search job sites
/// - `sites` - List registered sites
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/jobscout/config.toml`, supporting:
/// - HTTP and browser settings
/// - Search defaults
/// - Extra, replaced and disabled sites
pub mod config;

/// Core domain models.
///
/// - [`JobRecord`](domain::JobRecord): One posting with a content fingerprint
/// - [`SiteConfig`](domain::SiteConfig): Declarative site description
pub mod domain;

/// Turning fetched pages into job records.
pub mod extractor;

/// Page fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for page retrieval
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ChromeFetcher`](fetcher::chrome::ChromeFetcher): Headless Chrome rendering
/// - [`SiteFetcher`](fetcher::SiteFetcher): Per-site rate limiting and mode routing
pub mod fetcher;

/// Concurrent multi-site scraping runs.
pub mod orchestrator;

/// Site registry with the built-in South African job boards.
pub mod registry;
