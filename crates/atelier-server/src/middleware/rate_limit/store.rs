//! Shared fixed-window counters.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::clock::{Clock, SystemClock};
use super::policy::{PolicyTier, RatePolicy};

/// Outcome of an admission check, including the header snapshot for the
/// response it admits or rejects.
#[derive(Debug, Clone, Copy)]
pub struct Admission {
    /// Whether the request may proceed.
    pub allowed: bool,
    /// Slots per window under the checked policy.
    pub limit: u32,
    /// Slots left in the current window.
    pub remaining: u32,
    /// Time until the current window resets.
    pub reset_in: Duration,
}

#[derive(Debug)]
struct Window {
    count: u32,
    started_at: Instant,
}

/// Fixed-window counters keyed by `(client key, tier)`.
///
/// Each key owns an independent window; operations touch exactly one
/// shard entry, so contention on one client never blocks another.
pub struct FixedWindowTracker {
    windows: DashMap<(String, PolicyTier), Window>,
    clock: Arc<dyn Clock>,
}

impl FixedWindowTracker {
    /// Build a tracker on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Build a tracker on a caller-supplied clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: DashMap::new(),
            clock,
        }
    }

    /// Check a request against the key's open window.
    ///
    /// A policy that counts every outcome consumes its slot here, under
    /// the same entry guard as the check, so two racing requests can
    /// never both claim the last slot. An outcome-discriminating policy
    /// consumes nothing at admission and settles in [`record`].
    pub fn admit(&self, key: &str, policy: &RatePolicy) -> Admission {
        let now = self.clock.now();
        let mut entry = self
            .windows
            .entry((key.to_owned(), policy.tier))
            .or_insert_with(|| Window {
                count: 0,
                started_at: now,
            });
        let window = entry.value_mut();
        roll_if_expired(window, policy, now);

        if window.count >= policy.max_count {
            return Admission {
                allowed: false,
                limit: policy.max_count,
                remaining: 0,
                reset_in: reset_in(window, policy, now),
            };
        }

        if policy.counts_all() {
            window.count += 1;
        }

        Admission {
            allowed: true,
            limit: policy.max_count,
            remaining: policy.max_count - window.count,
            reset_in: reset_in(window, policy, now),
        }
    }

    /// Settle an outcome for a policy that charges only one outcome
    /// class. No-op for policies that already charged at admission.
    ///
    /// The count saturates at the limit: requests in flight together were
    /// all admitted against the same window, and their settlements must
    /// not push the count past what admission enforces.
    pub fn record(&self, key: &str, policy: &RatePolicy, success: bool) {
        if policy.counts_all() || !policy.counts_outcome(success) {
            return;
        }

        let now = self.clock.now();
        let mut entry = self
            .windows
            .entry((key.to_owned(), policy.tier))
            .or_insert_with(|| Window {
                count: 0,
                started_at: now,
            });
        let window = entry.value_mut();
        roll_if_expired(window, policy, now);

        if window.count < policy.max_count {
            window.count += 1;
        }
    }
}

impl Default for FixedWindowTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn roll_if_expired(window: &mut Window, policy: &RatePolicy, now: Instant) {
    if now.duration_since(window.started_at) >= policy.window {
        window.count = 0;
        window.started_at = now;
    }
}

fn reset_in(window: &Window, policy: &RatePolicy, now: Instant) -> Duration {
    (window.started_at + policy.window).saturating_duration_since(now)
}
