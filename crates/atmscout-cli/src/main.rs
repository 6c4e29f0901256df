use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "atmscout")]
#[command(about = "Crypto-ATM placement opportunity analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape candidate businesses and existing ATMs into the cache
    Scrape,
    /// Analyze cached data and export the opportunity CSV
    Analyze,
    /// Show the top-scored opportunities without a nearby competitor
    Report {
        /// How many opportunities to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Full pipeline: scrape, then analyze and export
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = atmscout_core::load_app_config_from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();
    tracing::debug!(?config, "configuration loaded");

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape => commands::run_scrape(&config).await,
        Commands::Analyze => commands::run_analyze(&config),
        Commands::Report { top } => commands::run_report(&config, top),
        Commands::Run => commands::run_full(&config).await,
    }
}
