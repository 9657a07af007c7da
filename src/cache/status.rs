//! Single-entry status cache
//!
//! Provides a `StatusCache` that serves the last fetched `GameStatus` while it
//! is younger than the cache duration and refreshes it from the upstream
//! source otherwise.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::clock::{Clock, SystemClock};
use crate::data::{GameStatus, PlayerCountSource};

/// A fetched status together with the time it was fetched
///
/// Replaced as a whole on every refresh.
#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    value: GameStatus,
    fetched_at: DateTime<Utc>,
}

/// Age and expiry metadata for the cached status
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheInfo {
    /// Seconds since the entry was fetched, one decimal place (0 when cold)
    pub age_seconds: f64,
    /// Seconds until the entry goes stale, one decimal place, never negative
    pub expires_in_seconds: f64,
    /// When the entry was fetched, `None` before the first fetch
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Memoizes the game status for a fixed duration
///
/// The check-refresh-store sequence runs under one async mutex, so callers
/// arriving while a refresh is in flight wait for it and then see the new
/// entry instead of fetching again.
#[derive(Debug)]
pub struct StatusCache {
    source: Arc<dyn PlayerCountSource>,
    clock: Arc<dyn Clock>,
    duration: Duration,
    entry: Mutex<Option<CacheEntry>>,
}

impl StatusCache {
    /// Creates an empty cache reading wall-clock time
    pub fn new(source: Arc<dyn PlayerCountSource>, duration: Duration) -> Self {
        Self::with_clock(source, duration, Arc::new(SystemClock))
    }

    /// Creates an empty cache with a custom clock
    pub fn with_clock(
        source: Arc<dyn PlayerCountSource>,
        duration: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            clock,
            duration,
            entry: Mutex::new(None),
        }
    }

    /// How long a fetched status is served before the next refresh
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns the cached status, refreshing it first if it is missing or stale
    pub async fn get(&self) -> GameStatus {
        let mut slot = self.entry.lock().await;
        self.current_or_refresh(&mut slot).await.value
    }

    /// Reports the age and remaining lifetime of the cached status
    ///
    /// Never triggers a refresh.
    pub async fn cache_info(&self) -> CacheInfo {
        let slot = self.entry.lock().await;
        self.info_for(slot.as_ref(), self.clock.now())
    }

    /// Same as `get` followed by `cache_info`, but both describe the same entry
    pub async fn get_with_info(&self) -> (GameStatus, CacheInfo) {
        let mut slot = self.entry.lock().await;
        let entry = self.current_or_refresh(&mut slot).await;
        (entry.value, self.info_for(Some(&entry), self.clock.now()))
    }

    async fn current_or_refresh(&self, slot: &mut Option<CacheEntry>) -> CacheEntry {
        if let Some(entry) = slot.as_ref() {
            if age(entry.fetched_at, self.clock.now()) < self.duration {
                tracing::debug!("Serving cached data");
                return *entry;
            }
        }

        tracing::info!("Fetching fresh data from upstream");
        let text = self.source.fetch_player_count_text().await;
        let entry = CacheEntry {
            value: GameStatus::from_scrape(text.as_deref()),
            fetched_at: self.clock.now(),
        };

        if !entry.value.homepage_accessible() {
            tracing::warn!(
                retry_in_secs = self.duration.as_secs(),
                "Homepage inaccessible, caching unknown status"
            );
        }

        *slot = Some(entry);
        entry
    }

    fn info_for(&self, entry: Option<&CacheEntry>, now: DateTime<Utc>) -> CacheInfo {
        let age = entry.map_or(Duration::ZERO, |entry| age(entry.fetched_at, now));

        CacheInfo {
            age_seconds: round_tenths(age.as_secs_f64()),
            expires_in_seconds: round_tenths(self.duration.saturating_sub(age).as_secs_f64()),
            fetched_at: entry.map(|entry| entry.fetched_at),
        }
    }
}

/// Time elapsed since `fetched_at`, zero if the clock went backwards
fn age(fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - fetched_at).to_std().unwrap_or(Duration::ZERO)
}

fn round_tenths(secs: f64) -> f64 {
    (secs * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CACHE_DURATION: Duration = Duration::from_secs(60);

    /// Source that replays scripted responses and counts calls
    #[derive(Debug, Default)]
    struct ScriptedSource {
        responses: std::sync::Mutex<VecDeque<Option<String>>>,
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl ScriptedSource {
        fn new(responses: &[Option<&str>]) -> Self {
            Self {
                responses: std::sync::Mutex::new(
                    responses.iter().copied().map(|r| r.map(str::to_string)).collect(),
                ),
                ..Default::default()
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PlayerCountSource for ScriptedSource {
        async fn fetch_player_count_text(&self) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            // Once the script runs out, keep repeating "unreachable"
            self.responses.lock().unwrap().pop_front().flatten()
        }
    }

    fn create_test_cache(
        source: ScriptedSource,
    ) -> (StatusCache, Arc<ScriptedSource>, Arc<ManualClock>) {
        let source = Arc::new(source);
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = StatusCache::with_clock(source.clone(), CACHE_DURATION, clock.clone());
        (cache, source, clock)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[tokio::test]
    async fn test_cold_get_fetches_once() {
        let (cache, source, _clock) =
            create_test_cache(ScriptedSource::new(&[Some("144,644 players")]));

        let status = cache.get().await;

        assert_eq!(status, GameStatus::from_player_count(144_644));
        assert_eq!(status.online(), Some(true));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_fresh_entry_is_served_without_fetching() {
        let (cache, source, clock) =
            create_test_cache(ScriptedSource::new(&[Some("500"), Some("900")]));

        let first = cache.get().await;
        clock.advance(chrono::Duration::seconds(30));
        let second = cache.get().await;
        clock.advance(chrono::Duration::milliseconds(29_999));
        let third = cache.get().await;

        assert_eq!(first, second);
        assert_eq!(first, third);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_refreshes_exactly_once() {
        let (cache, source, clock) =
            create_test_cache(ScriptedSource::new(&[Some("500"), Some("900")]));

        cache.get().await;
        clock.advance(chrono::Duration::seconds(60));
        let refreshed_at = clock.now();

        let status = cache.get().await;
        let again = cache.get().await;

        assert_eq!(status, GameStatus::from_player_count(900));
        assert_eq!(again, status);
        assert_eq!(source.calls(), 2);
        assert_eq!(cache.cache_info().await.fetched_at, Some(refreshed_at));
    }

    #[tokio::test]
    async fn test_unreachable_result_is_cached_for_full_duration() {
        let (cache, source, clock) = create_test_cache(ScriptedSource::new(&[None, Some("10")]));

        for _ in 0..10 {
            assert_eq!(cache.get().await, GameStatus::unreachable());
            clock.advance(chrono::Duration::seconds(5));
        }
        assert_eq!(source.calls(), 1);

        clock.advance(chrono::Duration::seconds(10));
        assert_eq!(cache.get().await, GameStatus::from_player_count(10));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_marker_without_digits_is_offline() {
        let (cache, _source, _clock) =
            create_test_cache(ScriptedSource::new(&[Some("Players: -")]));

        let status = cache.get().await;

        assert_eq!(status.online(), Some(false));
        assert_eq!(status.player_count(), 0);
        assert!(status.homepage_accessible());
    }

    #[tokio::test]
    async fn test_cache_info_when_cold() {
        let (cache, source, _clock) = create_test_cache(ScriptedSource::new(&[]));

        let info = cache.cache_info().await;

        assert_close(info.age_seconds, 0.0);
        assert_close(info.expires_in_seconds, 60.0);
        assert!(info.fetched_at.is_none());
        assert_eq!(source.calls(), 0, "cache_info must not fetch");
    }

    #[tokio::test]
    async fn test_cache_info_tracks_age() {
        let (cache, _source, clock) = create_test_cache(ScriptedSource::new(&[Some("1")]));

        cache.get().await;
        let info = cache.cache_info().await;
        assert_close(info.age_seconds, 0.0);
        assert_close(info.expires_in_seconds, 60.0);
        assert_eq!(info.fetched_at, Some(clock.now()));

        clock.advance(chrono::Duration::milliseconds(15_240));
        let info = cache.cache_info().await;
        assert_close(info.age_seconds, 15.2);
        assert_close(info.expires_in_seconds, 44.8);
    }

    #[tokio::test]
    async fn test_expires_in_never_negative() {
        let (cache, _source, clock) = create_test_cache(ScriptedSource::new(&[Some("1")]));

        cache.get().await;
        clock.advance(chrono::Duration::seconds(90));
        let info = cache.cache_info().await;

        assert_close(info.age_seconds, 90.0);
        assert_close(info.expires_in_seconds, 0.0);
    }

    #[tokio::test]
    async fn test_clock_moving_backwards_reports_zero_age() {
        let (cache, source, clock) = create_test_cache(ScriptedSource::new(&[Some("1")]));

        cache.get().await;
        clock.advance(chrono::Duration::seconds(-30));
        let info = cache.cache_info().await;

        assert_close(info.age_seconds, 0.0);
        assert_close(info.expires_in_seconds, 60.0);
        cache.get().await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_get_with_info_describes_returned_entry() {
        let (cache, _source, clock) =
            create_test_cache(ScriptedSource::new(&[Some("7"), Some("8")]));

        cache.get().await;
        clock.advance(chrono::Duration::seconds(61));
        let (status, info) = cache.get_with_info().await;

        assert_eq!(status, GameStatus::from_player_count(8));
        assert_eq!(info.fetched_at, Some(clock.now()));
        assert_close(info.age_seconds, 0.0);
    }

    #[tokio::test]
    async fn test_concurrent_stale_gets_share_one_refresh() {
        let source = ScriptedSource::new(&[Some("100"), Some("200"), Some("300")])
            .with_delay(Duration::from_millis(50));
        let (cache, source, clock) = create_test_cache(source);
        let cache = Arc::new(cache);

        cache.get().await;
        clock.advance(chrono::Duration::seconds(60));
        let refreshed_at = clock.now();

        let callers = (0..16).map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get_with_info().await })
        });
        let results = futures::future::join_all(callers).await;

        assert_eq!(source.calls(), 2);
        for result in results {
            let (status, info) = result.expect("caller task panicked");
            assert_eq!(status, GameStatus::from_player_count(200));
            assert_eq!(info.fetched_at, Some(refreshed_at));
        }
        assert_eq!(cache.get().await, GameStatus::from_player_count(200));
    }
}
