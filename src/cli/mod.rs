pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jobscout")]
#[command(about = "Search several job boards at once", long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ~/.config/jobscout/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the enabled job sites
    Search(SearchArgs),
    /// List the registered job sites
    Sites,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Search keywords
    pub query: String,

    /// Location to search in (default from config)
    #[arg(short, long)]
    pub location: Option<String>,

    /// Maximum jobs kept per site (default from config)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Only search these sites, enabled or not (repeatable)
    #[arg(short, long = "site")]
    pub sites: Vec<String>,

    /// Disable a site for this search (repeatable)
    #[arg(long)]
    pub disable: Vec<String>,

    /// Stop fetching after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// Launch headless Chrome for browser-mode sites
    #[arg(long)]
    pub browser: bool,

    /// Succeed even when every site failed or returned nothing
    #[arg(long)]
    pub allow_empty: bool,
}
