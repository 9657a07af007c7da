//! Cache module for the game status
//!
//! Holds a single memoized `GameStatus` with its fetch time and refreshes it
//! lazily from a `PlayerCountSource` once it is older than the configured
//! duration. Failed fetches are cached too, so the upstream is queried at most
//! once per cache window even while it is down.

mod clock;
mod status;

// ManualClock is exported for the integration tests under tests/
pub use clock::{Clock, ManualClock, SystemClock};
pub use status::{CacheInfo, StatusCache};
