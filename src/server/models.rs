//! HTTP API response models

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::CacheInfo;
use crate::config::{GAME_NAME, GAME_SHORT_NAME};
use crate::data::GameStatus;

/// Coarse status reported by the root endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLabel {
    Online,
    Offline,
    /// Homepage inaccessible
    Unknown,
}

/// Response body for `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatusResponse {
    pub status: StatusLabel,
    pub player_count: u64,
    /// Human-readable summary, e.g. "OSRS is online with 138,559 players"
    pub message: String,
}

impl From<GameStatus> for GameStatusResponse {
    fn from(status: GameStatus) -> Self {
        match status.online() {
            None => Self {
                status: StatusLabel::Unknown,
                player_count: 0,
                message: format!("{} status unknown - homepage inaccessible", GAME_SHORT_NAME),
            },
            Some(true) => Self {
                status: StatusLabel::Online,
                player_count: status.player_count(),
                message: format!(
                    "{} is online with {} players",
                    GAME_SHORT_NAME,
                    format_thousands(status.player_count())
                ),
            },
            Some(false) => Self {
                status: StatusLabel::Offline,
                player_count: status.player_count(),
                message: format!("{} is offline", GAME_SHORT_NAME),
            },
        }
    }
}

impl From<&GameStatusResponse> for GameStatus {
    fn from(response: &GameStatusResponse) -> Self {
        match response.status {
            StatusLabel::Unknown => GameStatus::unreachable(),
            StatusLabel::Online | StatusLabel::Offline => {
                GameStatus::from_player_count(response.player_count)
            }
        }
    }
}

/// Response body for `GET /status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedStatusResponse {
    pub game: String,
    /// `null` when the status is unknown
    pub online: Option<bool>,
    pub player_count: u64,
    pub homepage_accessible: bool,
    /// URL the status is scraped from
    pub source: String,
    pub cache_age_seconds: f64,
    pub cache_expires_in_seconds: f64,
    /// RFC 3339 UTC time the cached status was fetched
    pub cache_timestamp: String,
}

impl DetailedStatusResponse {
    /// Builds the detailed response from a status and the cache metadata of the same entry
    ///
    /// `now` stands in for the timestamp when nothing has been fetched yet.
    pub fn new(status: GameStatus, info: CacheInfo, source: &str, now: DateTime<Utc>) -> Self {
        Self {
            game: GAME_NAME.to_string(),
            online: status.online(),
            player_count: status.player_count(),
            homepage_accessible: status.homepage_accessible(),
            source: source.to_string(),
            cache_age_seconds: info.age_seconds,
            cache_expires_in_seconds: info.expires_in_seconds,
            cache_timestamp: info
                .fetched_at
                .unwrap_or(now)
                .to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }
}

impl From<&DetailedStatusResponse> for GameStatus {
    fn from(response: &DetailedStatusResponse) -> Self {
        if response.homepage_accessible {
            GameStatus::from_player_count(response.player_count)
        } else {
            GameStatus::unreachable()
        }
    }
}

/// Formats a count with comma thousands separators, e.g. `144644` -> `"144,644"`
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
