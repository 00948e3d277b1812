//! Scripted recognizer for pipeline tests.

use std::collections::VecDeque;

use crate::{next_utterance_id, SpeechRecognizer, SttError, TranscriptionEvent};

#[derive(Debug, Clone)]
pub struct ScriptedUtterance {
    /// Emit the final after this many accepted blocks.
    pub after_blocks: usize,
    pub text: String,
}

/// Plays back a fixed sequence of finalized utterances, each released after
/// a configurable number of audio blocks, so tests can drive the dialogue
/// without a speech model.
#[derive(Debug, Default)]
pub struct ScriptedRecognizer {
    script: VecDeque<ScriptedUtterance>,
    blocks_seen: usize,
}

impl ScriptedRecognizer {
    pub fn new(script: Vec<ScriptedUtterance>) -> Self {
        Self {
            script: script.into(),
            blocks_seen: 0,
        }
    }

    /// One utterance per entry, each released on the next block.
    pub fn with_utterances(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| ScriptedUtterance {
                    after_blocks: 1,
                    text: t.to_string(),
                })
                .collect(),
        )
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn accept_pcm16(&mut self, _pcm: &[i16]) -> Result<Option<TranscriptionEvent>, SttError> {
        self.blocks_seen += 1;
        let due = self
            .script
            .front()
            .map(|u| self.blocks_seen >= u.after_blocks)
            .unwrap_or(false);
        if !due {
            return Ok(None);
        }
        let utterance = match self.script.pop_front() {
            Some(u) => u,
            None => return Ok(None),
        };
        self.blocks_seen = 0;
        Ok(Some(TranscriptionEvent::Final {
            utterance_id: next_utterance_id(),
            text: utterance.text,
        }))
    }

    fn finalize(&mut self) -> Result<Option<TranscriptionEvent>, SttError> {
        self.blocks_seen = 0;
        Ok(self.script.pop_front().map(|u| TranscriptionEvent::Final {
            utterance_id: next_utterance_id(),
            text: u.text,
        }))
    }

    fn reset(&mut self) {
        self.blocks_seen = 0;
    }
}
