//! Time utilities for session pacing

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::Instant;

/// Milliseconds on the session's virtual clock
pub type Millis = u64;

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as i64
}

/// Whole seconds elapsed between a server timestamp and `now`, both Unix millis.
/// Clock skew that puts the server ahead of us counts as zero elapsed.
pub fn elapsed_secs_since(server_ts: i64, now: i64) -> u32 {
    let elapsed = now.saturating_sub(server_ts).max(0) / 1000;
    u32::try_from(elapsed).unwrap_or(u32::MAX)
}

/// Remaining seconds of a turn budget after resyncing against a server timestamp
pub fn resync_remaining(budget_secs: u32, server_ts: Option<i64>, now: i64) -> u32 {
    match server_ts {
        Some(ts) => budget_secs.saturating_sub(elapsed_secs_since(ts, now)),
        None => budget_secs,
    }
}

/// Maps tokio instants onto the session's virtual millisecond clock
#[derive(Debug, Clone)]
pub struct SessionClock {
    start: Instant,
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Virtual time now
    pub fn now(&self) -> Millis {
        self.start.elapsed().as_millis() as Millis
    }

    /// Tokio instant for a virtual deadline
    pub fn instant_at(&self, at: Millis) -> Instant {
        self.start + Duration::from_millis(at)
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}
