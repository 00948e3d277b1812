//! Synthesizer trait

use crate::error::TtsResult;

/// Blocking speech synthesis interface.
///
/// `speak` must not return until playback has completed: the caller holds
/// the half-duplex gate closed for exactly the duration of the call plus the
/// settle delay.
pub trait SpeechSynthesizer: Send {
    /// Engine name for logs.
    fn name(&self) -> &str;

    /// Whether the engine can synthesize on this system.
    fn is_available(&self) -> bool {
        true
    }

    /// Speak the given text and block until playback finishes. Empty or
    /// whitespace-only text is a no-op.
    fn speak(&mut self, text: &str) -> TtsResult<()>;
}

impl<T: SpeechSynthesizer + ?Sized> SpeechSynthesizer for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn speak(&mut self, text: &str) -> TtsResult<()> {
        (**self).speak(text)
    }
}
