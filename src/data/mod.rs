//! Core data models for OSWatch
//!
//! This module contains the game status value type and the homepage scraper
//! that produces the raw player count signal it is built from.

pub mod homepage;

pub use homepage::{parse_player_count, HomepageScraper, PlayerCountSource, ScraperError};

/// Result of one upstream check
///
/// Immutable once produced. The constructors keep the fields consistent:
/// an inaccessible homepage always means unknown status and zero players,
/// an accessible one means online exactly when players were counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStatus {
    online: Option<bool>,
    player_count: u64,
    homepage_accessible: bool,
}

impl GameStatus {
    /// Status for a homepage that could not be read
    pub fn unreachable() -> Self {
        Self {
            online: None,
            player_count: 0,
            homepage_accessible: false,
        }
    }

    /// Status for a homepage that was read and yielded `player_count`
    pub fn from_player_count(player_count: u64) -> Self {
        Self {
            online: Some(player_count > 0),
            player_count,
            homepage_accessible: true,
        }
    }

    /// Builds the status from the scraped text, or `None` if the homepage was unreachable
    pub fn from_scrape(text: Option<&str>) -> Self {
        match text {
            Some(text) => Self::from_player_count(parse_player_count(Some(text))),
            None => Self::unreachable(),
        }
    }

    /// Whether the game is online, `None` when unknown
    pub fn online(&self) -> Option<bool> {
        self.online
    }

    /// Number of players counted (0 when unknown)
    pub fn player_count(&self) -> u64 {
        self.player_count
    }

    /// Whether the homepage delivered the player count marker
    pub fn homepage_accessible(&self) -> bool {
        self.homepage_accessible
    }
}
