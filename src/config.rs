//! Process-wide configuration
//!
//! Read-only after startup. Built from the command line in `cli`, or from
//! `Config::default()` in tests.

use std::time::Duration;

/// Full name of the monitored game
pub const GAME_NAME: &str = "Old School RuneScape";

/// Short name used in human-readable messages
pub const GAME_SHORT_NAME: &str = "OSRS";

/// Default homepage scraped for the player count
pub const DEFAULT_SOURCE_URL: &str = "https://oldschool.runescape.com";

/// Default cache lifetime in seconds
pub const DEFAULT_CACHE_DURATION_SECS: u64 = 60;

/// Default upstream request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every upstream request
pub const DEFAULT_USER_AGENT: &str = "OSRS-Status-Monitor/1.0 (https://github.com/JoshPaulie/OSWatch) - Monitoring server status with 60s cache";

/// How the simple status endpoint reports an inaccessible homepage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum UnknownPolicy {
    /// Respond 200 with status "unknown"
    #[default]
    InBand,
    /// Respond 503 with the same "unknown" body
    ServiceUnavailable,
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Homepage scraped for the player count
    pub source_url: String,
    /// How long a fetched status stays fresh
    pub cache_duration: Duration,
    /// Timeout for the upstream request
    pub request_timeout: Duration,
    /// User agent sent upstream
    pub user_agent: String,
    /// How the simple endpoint surfaces an unknown status
    pub unknown_policy: UnknownPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            source_url: DEFAULT_SOURCE_URL.to_string(),
            cache_duration: Duration::from_secs(DEFAULT_CACHE_DURATION_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            unknown_policy: UnknownPolicy::InBand,
        }
    }
}

impl Config {
    /// Socket address string for the listener, e.g. `0.0.0.0:8000`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
