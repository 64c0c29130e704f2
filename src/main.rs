use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jobscout::app::AppContext;
use jobscout::cli::{commands, Cli, Commands};
use jobscout::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over the default filter
    let default_filter = if cli.verbose {
        "jobscout=debug"
    } else {
        "jobscout=info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Search(args) => {
            let ctx = AppContext::new(config, args.browser).await?;
            commands::search(&ctx, &args).await?;
        }
        Commands::Sites => {
            let ctx = AppContext::http_only(config)?;
            commands::list_sites(&ctx)?;
        }
    }

    Ok(())
}
