use std::sync::Arc;

use crate::keywords::KeywordCatalog;

/// Decides whether a normalized transcript is signal or noise before the
/// state machine sees it. Discarded transcripts cause no prompt and no
/// transition.
///
/// The rule is mode-dependent: while waiting for a trigger only wake/trigger
/// phrases count; once a dialogue is active any phrase from any category is
/// accepted, deliberately tolerating users who answer slightly off-step.
pub struct SpeechFilter {
    catalog: Arc<KeywordCatalog>,
    wake_word: String,
}

impl SpeechFilter {
    pub fn new(catalog: Arc<KeywordCatalog>, wake_word: String) -> Self {
        Self { catalog, wake_word }
    }

    pub fn is_valid(&self, text: &str, listening_for_trigger: bool) -> bool {
        if text.is_empty() {
            return false;
        }

        if listening_for_trigger {
            return text.starts_with(&self.wake_word) || self.contains_trigger_phrase(text);
        }

        // "continue" always re-engages an active dialogue.
        if text.split_whitespace().any(|w| w == "continue") {
            return true;
        }

        self.catalog
            .iter()
            .any(|(_, entries)| {
                entries
                    .iter()
                    .any(|e| e.phrases.iter().any(|p| text.contains(p.as_str())))
            })
    }

    fn contains_trigger_phrase(&self, text: &str) -> bool {
        self.catalog
            .entries(crate::keywords::Category::Trigger)
            .iter()
            .any(|e| e.phrases.iter().any(|p| text.contains(p.as_str())))
    }
}
