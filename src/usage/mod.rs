// Usage counter service
// Author: kelexine (https://github.com/kelexine)

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide request/token/image counters.
///
/// Injected as `Arc<UsageTracker>` wherever counting happens so tests can
/// substitute a fresh instance and assert exact increments. Counters only
/// grow; `reset` is explicit and never happens automatically.
pub struct UsageTracker {
    total_requests: AtomicU64,
    total_tokens: AtomicU64,
    total_images: AtomicU64,
    last_reset: RwLock<DateTime<Utc>>,
}

/// Point-in-time view of the counters, as reported by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct UsageSnapshot {
    pub total_requests: u64,
    pub total_tokens: u64,
    pub total_images: u64,
    pub last_reset: DateTime<Utc>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            total_tokens: AtomicU64::new(0),
            total_images: AtomicU64::new(0),
            last_reset: RwLock::new(Utc::now()),
        }
    }

    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_tokens(&self, count: u64) {
        self.total_tokens.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_image(&self) {
        self.total_images.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            total_tokens: self.total_tokens.load(Ordering::Relaxed),
            total_images: self.total_images.load(Ordering::Relaxed),
            last_reset: *self.last_reset.read(),
        }
    }

    /// Zero every counter and stamp the reset time.
    pub fn reset(&self) {
        self.total_requests.store(0, Ordering::Relaxed);
        self.total_tokens.store(0, Ordering::Relaxed);
        self.total_images.store(0, Ordering::Relaxed);
        *self.last_reset.write() = Utc::now();
    }
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let tracker = UsageTracker::new();
        tracker.record_request();
        tracker.record_request();
        tracker.add_tokens(42);
        tracker.record_image();

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.total_tokens, 42);
        assert_eq!(snapshot.total_images, 1);
    }

    #[test]
    fn test_reset_zeroes_counters() {
        let tracker = UsageTracker::new();
        tracker.record_request();
        tracker.add_tokens(10);

        let before = tracker.snapshot().last_reset;
        tracker.reset();
        let snapshot = tracker.snapshot();

        assert_eq!(snapshot.total_requests, 0);
        assert_eq!(snapshot.total_tokens, 0);
        assert_eq!(snapshot.total_images, 0);
        assert!(snapshot.last_reset >= before);
    }
}
