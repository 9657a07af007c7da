//! Command-line interface parsing for OSWatch
//!
//! Every flag can also be set through an `OSWATCH_*` environment variable.
//! Parsed arguments are validated into a [`Config`] before the server starts.

use std::time::Duration;

use clap::Parser;
use reqwest::Url;
use thiserror::Error;

use crate::config::{
    Config, UnknownPolicy, DEFAULT_CACHE_DURATION_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SOURCE_URL, DEFAULT_USER_AGENT,
};

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// A duration argument was zero
    #[error("Invalid {0}: must be at least 1 second")]
    InvalidDuration(&'static str),

    /// The source URL is not an absolute http(s) URL
    #[error("Invalid source URL: '{0}'")]
    InvalidSourceUrl(String),
}

/// OSWatch - Old School RuneScape world status relay
#[derive(Parser, Debug)]
#[command(name = "oswatch")]
#[command(about = "Serves cached Old School RuneScape server status over HTTP")]
#[command(version)]
pub struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, env = "OSWATCH_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port to listen on
    #[arg(long, short, env = "OSWATCH_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Homepage to scrape for the player count
    #[arg(long, env = "OSWATCH_SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    /// Seconds a fetched status is served before the homepage is checked again
    #[arg(long, env = "OSWATCH_CACHE_DURATION", default_value_t = DEFAULT_CACHE_DURATION_SECS)]
    pub cache_duration: u64,

    /// Seconds to wait for the homepage before treating it as unreachable
    #[arg(long, env = "OSWATCH_REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout: u64,

    /// User-Agent header sent to the homepage
    #[arg(long, env = "OSWATCH_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// How `/` reports an inaccessible homepage
    #[arg(long, env = "OSWATCH_UNKNOWN_POLICY", value_enum, default_value_t = UnknownPolicy::InBand)]
    pub unknown_policy: UnknownPolicy,
}

impl Config {
    /// Creates a Config from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(Config)` with validated settings
    /// * `Err(CliError)` if a duration is zero or the source URL is unusable
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.cache_duration == 0 {
            return Err(CliError::InvalidDuration("cache duration"));
        }
        if cli.request_timeout == 0 {
            return Err(CliError::InvalidDuration("request timeout"));
        }
        validate_source_url(&cli.source_url)?;

        Ok(Config {
            bind_address: cli.bind.clone(),
            port: cli.port,
            source_url: cli.source_url.clone(),
            cache_duration: Duration::from_secs(cli.cache_duration),
            request_timeout: Duration::from_secs(cli.request_timeout),
            user_agent: cli.user_agent.clone(),
            unknown_policy: cli.unknown_policy,
        })
    }
}

/// Accepts only absolute `http` or `https` URLs
fn validate_source_url(url: &str) -> Result<(), CliError> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(CliError::InvalidSourceUrl(url.to_string())),
    }
}
