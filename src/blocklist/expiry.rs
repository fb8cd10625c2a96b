// src/blocklist/expiry.rs
// Fixed-duration expiry for block entries

use super::BlockEntry;

/// One week.
pub const DEFAULT_BLOCK_DURATION_SECS: u64 = 604_800;

/// Returns true once the entry's age has reached `duration_secs`.
///
/// An entry blocked at `T` is active for every `now` in `[T, T + duration)`;
/// at exactly `T + duration` it already counts as expired.
pub fn is_expired(entry: &BlockEntry, now: u64, duration_secs: u64) -> bool {
    now >= entry.blocked_at.saturating_add(duration_secs)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    duration_secs: u64,
}

impl ExpiryPolicy {
    pub fn new(duration_secs: u64) -> Self {
        Self { duration_secs }
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn is_expired(&self, entry: &BlockEntry, now: u64) -> bool {
        is_expired(entry, now, self.duration_secs)
    }

    /// First second at which the entry no longer counts as blocked.
    pub fn expires_at(&self, entry: &BlockEntry) -> u64 {
        entry.blocked_at.saturating_add(self.duration_secs)
    }
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCK_DURATION_SECS)
    }
}
