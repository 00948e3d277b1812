use rtrb::{Consumer, Producer, RingBuffer};
use tracing::warn;

/// Bounded SPSC frame queue between the capture callback and the
/// recognition loop. Built on rtrb so the producer side is real-time safe.
pub struct AudioRingBuffer {
    producer: Producer<i16>,
    consumer: Consumer<i16>,
}

impl AudioRingBuffer {
    pub fn new(capacity: usize) -> Self {
        let (producer, consumer) = RingBuffer::new(capacity);
        Self { producer, consumer }
    }

    /// Split into the producer half (capture thread) and the consumer half
    /// (processing thread).
    pub fn split(self) -> (AudioProducer, AudioConsumer) {
        (
            AudioProducer {
                producer: self.producer,
            },
            AudioConsumer {
                consumer: self.consumer,
            },
        )
    }
}

pub struct AudioProducer {
    producer: Producer<i16>,
}

impl AudioProducer {
    /// Enqueue one captured block without blocking. A block that does not
    /// fit is dropped whole; partially enqueued blocks would garble the
    /// recognizer's input.
    pub fn push_block(&mut self, samples: &[i16]) -> bool {
        let mut chunk = match self.producer.write_chunk(samples.len()) {
            Ok(chunk) => chunk,
            Err(_) => {
                warn!(
                    "Frame queue full: dropped block of {} samples",
                    samples.len()
                );
                return false;
            }
        };

        // The write region may wrap; fill both slices.
        let (first, second) = chunk.as_mut_slices();
        let split = first.len();
        if split > 0 {
            first.copy_from_slice(&samples[..split]);
        }
        if !second.is_empty() {
            second.copy_from_slice(&samples[split..]);
        }
        chunk.commit_all();
        true
    }

    pub fn free_slots(&self) -> usize {
        self.producer.slots()
    }
}

pub struct AudioConsumer {
    consumer: Consumer<i16>,
}

impl AudioConsumer {
    /// Read up to `buffer.len()` samples without blocking; returns how many
    /// were read.
    pub fn pop(&mut self, buffer: &mut [i16]) -> usize {
        let chunk = match self.consumer.read_chunk(buffer.len()) {
            Ok(chunk) => chunk,
            Err(rtrb::chunks::ChunkError::TooFewSlots(available)) => {
                if available == 0 {
                    return 0;
                }
                match self.consumer.read_chunk(available) {
                    Ok(chunk) => chunk,
                    Err(_) => return 0,
                }
            }
        };

        let len = chunk.len();
        let (first, second) = chunk.as_slices();
        let split = first.len();
        if split > 0 {
            buffer[..split].copy_from_slice(first);
        }
        if !second.is_empty() {
            buffer[split..split + second.len()].copy_from_slice(second);
        }
        chunk.commit_all();
        len
    }

    /// Samples currently queued.
    pub fn queued(&self) -> usize {
        self.consumer.slots()
    }
}
