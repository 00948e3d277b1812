pub mod capture;
pub mod frame_reader;
pub mod gate;
pub mod ring_buffer;
pub mod watchdog;

// Public API
pub use capture::{CaptureStats, CaptureThread, DeviceConfig};
pub use frame_reader::{AudioFrame, FrameReader};
pub use gate::SpeakingGate;
pub use ring_buffer::{AudioConsumer, AudioProducer, AudioRingBuffer};
pub use watchdog::StallTracker;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Input device name; `None` picks the host default.
    #[serde(default)]
    pub device: Option<String>,
    /// Frame queue capacity in samples.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Echo settle delay after a prompt finishes, in milliseconds.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Seconds without captured frames before the stream is flagged stalled.
    #[serde(default = "default_watchdog_timeout_secs")]
    pub watchdog_timeout_secs: u64,
}

fn default_queue_capacity() -> usize {
    65_536
}

fn default_settle_delay_ms() -> u64 {
    300
}

fn default_watchdog_timeout_secs() -> u64 {
    5
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            queue_capacity: default_queue_capacity(),
            settle_delay_ms: default_settle_delay_ms(),
            watchdog_timeout_secs: default_watchdog_timeout_secs(),
        }
    }
}
