use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use barista_foundation::AudioError;

/// Tracks whether captured frames are still arriving. The capture thread's
/// supervision loop polls `check`; a stall is reported once per episode so
/// the log does not fill with duplicates.
pub struct StallTracker {
    timeout: Duration,
    last_feed: RwLock<Option<Instant>>,
    stalled: AtomicBool,
}

impl StallTracker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            last_feed: RwLock::new(None),
            stalled: AtomicBool::new(false),
        }
    }

    /// Start (or restart) the countdown from now.
    pub fn arm(&self) {
        *self.last_feed.write() = Some(Instant::now());
        self.stalled.store(false, Ordering::SeqCst);
    }

    /// Called from the capture callback on every delivered block.
    pub fn feed(&self) {
        *self.last_feed.write() = Some(Instant::now());
        self.stalled.store(false, Ordering::SeqCst);
    }

    /// Returns true exactly once when the stream goes quiet for longer than
    /// the timeout. Unarmed trackers never report a stall.
    pub fn check(&self) -> bool {
        let last = match *self.last_feed.read() {
            Some(t) => t,
            None => return false,
        };
        if last.elapsed() > self.timeout && !self.stalled.swap(true, Ordering::SeqCst) {
            tracing::warn!(
                "{}",
                AudioError::NoDataTimeout {
                    duration: last.elapsed()
                }
            );
            return true;
        }
        false
    }

    pub fn is_stalled(&self) -> bool {
        self.stalled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unarmed_tracker_never_stalls() {
        let tracker = StallTracker::new(Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));
        assert!(!tracker.check());
    }

    #[test]
    fn stall_is_reported_once_and_cleared_by_feed() {
        let tracker = StallTracker::new(Duration::from_millis(1));
        tracker.arm();
        std::thread::sleep(Duration::from_millis(10));

        assert!(tracker.check());
        // Same episode: not reported again.
        assert!(!tracker.check());
        assert!(tracker.is_stalled());

        tracker.feed();
        assert!(!tracker.is_stalled());
    }
}
