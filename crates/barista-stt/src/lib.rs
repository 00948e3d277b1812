//! Speech-to-text boundary for AutoBarista.
//!
//! The recognition engine is an external collaborator; this crate only
//! defines the trait it plugs into, the events it produces, and the stand-in
//! recognizers used for tests and headless runs. The kiosk processes
//! finalized utterances only; partial results are delivered but ignored.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

pub mod plugins;
pub mod types;

pub use types::{RecognizerConfig, TranscriptionEvent};

static UTTERANCE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique utterance ID.
pub fn next_utterance_id() -> u64 {
    UTTERANCE_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

#[derive(Error, Debug)]
pub enum SttError {
    #[error("Recognition engine error: {0}")]
    Engine(String),

    #[error("Invalid audio input: {0}")]
    InvalidAudio(String),
}

/// Streaming recognition interface.
///
/// Implementations consume mono i16 PCM at the device's native rate and emit
/// transcription events as utterances complete. Everything is synchronous:
/// the kiosk has exactly one processing flow and it owns the recognizer.
pub trait SpeechRecognizer: Send {
    /// Feed one captured block. Returns an event when the engine has one.
    fn accept_pcm16(&mut self, pcm: &[i16]) -> Result<Option<TranscriptionEvent>, SttError>;

    /// Flush the current utterance, returning its final event if any.
    fn finalize(&mut self) -> Result<Option<TranscriptionEvent>, SttError>;

    /// Discard any buffered audio and start a fresh utterance.
    fn reset(&mut self);
}
