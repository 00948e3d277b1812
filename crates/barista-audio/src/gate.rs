use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use barista_foundation::clock::{real_clock, SharedClock};

/// Half-duplex gate between prompt playback and microphone capture.
///
/// The capture callback drops every block delivered while the flag is set,
/// so the recognizer never hears the kiosk's own voice. The flag is the only
/// mutable value shared between the capture and processing flows.
pub struct SpeakingGate {
    speaking: AtomicBool,
    settle: Duration,
    clock: SharedClock,
}

impl SpeakingGate {
    pub fn new(settle: Duration) -> Self {
        Self::with_clock(settle, real_clock())
    }

    pub fn with_clock(settle: Duration, clock: SharedClock) -> Self {
        Self {
            speaking: AtomicBool::new(false),
            settle,
            clock,
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::Acquire)
    }

    /// Run a blocking playback call with the gate closed. The gate stays
    /// closed for the settle delay after `f` returns so echo tails are
    /// drained before capture resumes.
    pub fn while_speaking<R>(&self, f: impl FnOnce() -> R) -> R {
        self.speaking.store(true, Ordering::Release);
        let out = f();
        self.clock.sleep(self.settle);
        self.speaking.store(false, Ordering::Release);
        out
    }
}
