use std::time::Instant;

use super::ring_buffer::AudioConsumer;

/// One mono PCM block on its way to the recognizer.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub samples: Vec<i16>,
    pub timestamp: Instant,
    pub sample_rate: u32,
}

/// Consumer-side view of the frame queue; reconstructs timestamps from the
/// running sample count.
pub struct FrameReader {
    consumer: AudioConsumer,
    sample_rate: u32,
    samples_read: u64,
    start_time: Instant,
}

impl FrameReader {
    pub fn new(consumer: AudioConsumer, sample_rate: u32) -> Self {
        Self {
            consumer,
            sample_rate,
            samples_read: 0,
            start_time: Instant::now(),
        }
    }

    /// Read the next block, up to `max_samples`. Returns `None` when the
    /// queue is empty.
    pub fn read_frame(&mut self, max_samples: usize) -> Option<AudioFrame> {
        let mut buffer = vec![0i16; max_samples];
        let samples_read = self.consumer.pop(&mut buffer);

        if samples_read == 0 {
            return None;
        }

        buffer.truncate(samples_read);

        let elapsed_ms = (self.samples_read * 1000) / self.sample_rate as u64;
        let timestamp = self.start_time + std::time::Duration::from_millis(elapsed_ms);

        self.samples_read += samples_read as u64;

        Some(AudioFrame {
            samples: buffer,
            timestamp,
            sample_rate: self.sample_rate,
        })
    }

    pub fn available_samples(&self) -> usize {
        self.consumer.queued()
    }
}
