//! Recognizer that hears nothing. Used when no engine is configured so the
//! rest of the pipeline can run on machines without a speech model.

use crate::{SpeechRecognizer, SttError, TranscriptionEvent};

#[derive(Debug, Default)]
pub struct NoopRecognizer;

impl NoopRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl SpeechRecognizer for NoopRecognizer {
    fn accept_pcm16(&mut self, _pcm: &[i16]) -> Result<Option<TranscriptionEvent>, SttError> {
        Ok(None)
    }

    fn finalize(&mut self) -> Result<Option<TranscriptionEvent>, SttError> {
        Ok(None)
    }

    fn reset(&mut self) {}
}
