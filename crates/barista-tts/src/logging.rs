//! Stand-in synthesizer that routes prompts to the log. Default when no
//! synthesis command is configured, and handy on machines with no speaker.

use tracing::info;

use crate::engine::SpeechSynthesizer;
use crate::error::TtsResult;

#[derive(Debug, Default)]
pub struct LoggingSynthesizer;

impl LoggingSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

impl SpeechSynthesizer for LoggingSynthesizer {
    fn name(&self) -> &str {
        "logging"
    }

    fn speak(&mut self, text: &str) -> TtsResult<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        info!(target: "tts", "{}", text);
        Ok(())
    }
}
