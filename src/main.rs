//! OSWatch - Old School RuneScape world status relay
//!
//! Scrapes the player count from the game homepage, caches the result for a
//! short fixed interval, and serves it over HTTP.

use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use oswatch::cache::StatusCache;
use oswatch::cli::Cli;
use oswatch::config::Config;
use oswatch::data::HomepageScraper;
use oswatch::server;

/// Installs the global fmt subscriber, INFO unless `RUST_LOG` says otherwise
fn init_logging() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_line_number(true)
        .with_file(true)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", err);
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(2);
        }
    };

    init_logging();

    let scraper = match HomepageScraper::from_config(&config) {
        Ok(scraper) => scraper,
        Err(err) => {
            tracing::error!("{}", err);
            process::exit(1);
        }
    };
    tracing::info!(
        source = %config.source_url,
        cache_secs = config.cache_duration.as_secs(),
        timeout_secs = config.request_timeout.as_secs(),
        "Starting OSWatch"
    );

    let cache = Arc::new(StatusCache::new(Arc::new(scraper), config.cache_duration));

    if let Err(err) = server::serve(&config, cache).await {
        tracing::error!("Server error: {}", err);
        process::exit(1);
    }
}
