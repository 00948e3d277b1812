use serde::{Deserialize, Serialize};

use crate::matcher::DEFAULT_THRESHOLD;

/// Dialogue policy knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogConfig {
    /// Minimum fuzzy score (0-100) for a keyword match.
    #[serde(default = "default_threshold")]
    pub match_threshold: u8,
    /// Wake word that starts a session when an utterance begins with it.
    #[serde(default = "default_wake_word")]
    pub wake_word: String,
    /// Additional phrases that start a session when contained anywhere.
    #[serde(default = "default_trigger_phrases")]
    pub trigger_phrases: Vec<String>,
    /// Consecutive re-prompts allowed in one phase before the session is
    /// abandoned. `None` keeps re-asking forever.
    #[serde(default)]
    pub max_reprompts: Option<u32>,
}

fn default_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

fn default_wake_word() -> String {
    "autobarista".to_string()
}

fn default_trigger_phrases() -> Vec<String> {
    ["continue", "go on", "carry on", "can you", "ok", "start", "autobarista"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            match_threshold: default_threshold(),
            wake_word: default_wake_word(),
            trigger_phrases: default_trigger_phrases(),
            max_reprompts: None,
        }
    }
}
