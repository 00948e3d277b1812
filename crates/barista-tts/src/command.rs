//! Synthesis via an external command.
//!
//! Spawns the configured program once per prompt with the text as the last
//! argument and waits for it to exit, which gives the blocking-playback
//! semantics the gate needs. Works with espeak-style tools out of the box.

use std::process::Command;

use tracing::debug;

use crate::engine::SpeechSynthesizer;
use crate::error::{TtsError, TtsResult};

pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
}

impl CommandSynthesizer {
    pub fn new(program: &str, args: &[String]) -> Self {
        Self {
            program: program.to_string(),
            args: args.to_vec(),
        }
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn name(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        // A bare name is resolved through PATH at spawn time; only an
        // explicit path can be checked up front.
        !self.program.contains('/') || std::path::Path::new(&self.program).exists()
    }

    fn speak(&mut self, text: &str) -> TtsResult<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        debug!(target: "tts", "[{}]: {}", self.program, text);
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .status()?;

        if !status.success() {
            return Err(TtsError::SynthesisFailed(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }
}
