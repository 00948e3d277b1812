//! End-to-end check of the half-duplex behavior: capture feeds the frame
//! queue through the gate, and the reader on the other side only ever sees
//! blocks delivered while the kiosk was quiet.

use std::sync::atomic::Ordering;
use std::time::Duration;

use barista_audio::capture::{ingest_block, CaptureStats};
use barista_audio::{AudioRingBuffer, FrameReader, SpeakingGate};
use barista_foundation::clock::test_clock;

#[test]
fn queue_length_is_flat_while_speaking() {
    let gate = SpeakingGate::with_clock(Duration::from_millis(300), test_clock());
    let stats = CaptureStats::default();
    let rb = AudioRingBuffer::new(4096);
    let (mut producer, consumer) = rb.split();
    let mut reader = FrameReader::new(consumer, 16_000);

    // Baseline: frames flow.
    ingest_block(&gate, &mut producer, &stats, &[1i16; 160]);
    assert_eq!(reader.available_samples(), 160);

    // Prompt playback: every delivered block is dropped, queue stays flat.
    gate.while_speaking(|| {
        for _ in 0..5 {
            ingest_block(&gate, &mut producer, &stats, &[2i16; 160]);
        }
        assert_eq!(reader.available_samples(), 160);
    });
    assert_eq!(stats.blocks_gated.load(Ordering::Relaxed), 5);

    // Settle elapsed on the virtual clock: back to baseline behavior.
    ingest_block(&gate, &mut producer, &stats, &[3i16; 160]);
    assert_eq!(reader.available_samples(), 320);

    // The reader never observes the gated blocks.
    let first = reader.read_frame(160).expect("baseline frame");
    let second = reader.read_frame(160).expect("post-settle frame");
    assert!(first.samples.iter().all(|&s| s == 1));
    assert!(second.samples.iter().all(|&s| s == 3));
    assert!(reader.read_frame(160).is_none());
}
