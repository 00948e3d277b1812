//! Transcription event types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptionEvent {
    /// Ongoing speech; the kiosk ignores these.
    Partial { utterance_id: u64, text: String },
    /// A finalized utterance, ready for the dialogue machine.
    Final { utterance_id: u64, text: String },
    /// Engine-reported failure for one utterance.
    Error { code: String, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizerConfig {
    /// Which recognizer to construct; "noop" ships with the kiosk, real
    /// engines register behind the same trait.
    #[serde(default = "default_engine")]
    pub engine: String,
    /// Emit partial recognition results.
    #[serde(default)]
    pub partial_results: bool,
}

fn default_engine() -> String {
    "noop".to_string()
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            partial_results: false,
        }
    }
}
