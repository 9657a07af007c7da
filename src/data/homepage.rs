//! Old School RuneScape homepage scraper
//!
//! Fetches the public homepage and pulls the player count text out of the
//! `<p class="player-count">` element. Everything about the page structure
//! stays in this module; callers only see `Option<String>`.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use thiserror::Error;

use crate::config::Config;

/// CSS selector for the element holding the player count
const PLAYER_COUNT_SELECTOR: &str = "p.player-count";

/// Errors that can occur while scraping the homepage
#[derive(Debug, Error)]
pub enum ScraperError {
    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Network failure, timeout, or non-success status
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The page was fetched but did not contain the player count element
    #[error("Player count element '{0}' not found on page")]
    MarkerNotFound(&'static str),
}

/// Source of the raw player count text
///
/// Implementations never fail outward: any problem reaching or reading the
/// source is reported as `None`.
#[async_trait]
pub trait PlayerCountSource: Debug + Send + Sync {
    /// Returns the raw player count text, or `None` if the source was unreachable
    async fn fetch_player_count_text(&self) -> Option<String>;
}

/// Scrapes the player count from the game homepage
#[derive(Debug, Clone)]
pub struct HomepageScraper {
    client: Client,
    source_url: String,
}

impl HomepageScraper {
    /// Creates a scraper using the source URL, timeout and user agent from `config`
    pub fn from_config(config: &Config) -> Result<Self, ScraperError> {
        let client = build_client(config.request_timeout, &config.user_agent)?;
        Ok(Self::with_client(client, config.source_url.clone()))
    }

    /// Creates a scraper with a custom HTTP client
    pub fn with_client(client: Client, source_url: impl Into<String>) -> Self {
        Self {
            client,
            source_url: source_url.into(),
        }
    }

    /// URL the scraper reads from
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Fetches the homepage and extracts the player count text
    ///
    /// # Returns
    /// * `Ok(String)` - Text of the player count element (may contain labels and commas)
    /// * `Err(ScraperError)` - If the request fails or the element is missing
    pub async fn scrape(&self) -> Result<String, ScraperError> {
        let body = self.fetch_page().await?;
        extract_player_count_text(&body)
            .ok_or(ScraperError::MarkerNotFound(PLAYER_COUNT_SELECTOR))
    }

    /// Fetches the raw homepage HTML
    async fn fetch_page(&self) -> Result<String, ScraperError> {
        let body = self
            .client
            .get(&self.source_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(body)
    }
}

#[async_trait]
impl PlayerCountSource for HomepageScraper {
    async fn fetch_player_count_text(&self) -> Option<String> {
        match self.scrape().await {
            Ok(text) => Some(text),
            Err(err @ ScraperError::MarkerNotFound(_)) => {
                tracing::warn!(url = %self.source_url, "Homepage reachable but unreadable: {}", err);
                None
            }
            Err(err) => {
                tracing::error!(url = %self.source_url, "Error fetching player count: {}", err);
                None
            }
        }
    }
}

/// Builds the HTTP client with a bounded timeout and identifying user agent
fn build_client(timeout: Duration, user_agent: &str) -> Result<Client, ScraperError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(ScraperError::ClientBuild)
}

/// Extracts the text of the first player count element from an HTML document
///
/// Returns `None` if the element does not exist.
pub fn extract_player_count_text(html: &str) -> Option<String> {
    let selector = Selector::parse(PLAYER_COUNT_SELECTOR).ok()?;
    let document = Html::parse_document(html);
    let element = document.select(&selector).next()?;

    Some(element.text().collect())
}

/// Parses a player count out of free-form text
///
/// Every ASCII digit is kept in order and the rest is dropped, so
/// `"144,644 players"` reads as `144644`. Empty input, `None`, or text
/// without digits gives 0. Values beyond `u64::MAX` saturate.
pub fn parse_player_count(text: Option<&str>) -> u64 {
    let Some(text) = text else {
        return 0;
    };

    text.chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u64::from(digit))
        })
}
