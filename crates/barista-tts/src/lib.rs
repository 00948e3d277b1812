//! Text-to-speech boundary for AutoBarista.
//!
//! Synthesis and playback are external collaborators; the kiosk only needs a
//! blocking `speak` call that returns once playback has finished. The
//! dialogue machine wraps every call in the audio gate, which is why the
//! call must not return early.

pub mod command;
pub mod engine;
pub mod error;
pub mod logging;
pub mod types;

pub use command::CommandSynthesizer;
pub use engine::SpeechSynthesizer;
pub use error::{TtsError, TtsResult};
pub use logging::LoggingSynthesizer;
pub use types::TtsConfig;

/// Build the synthesizer described by the configuration: an external command
/// when one is configured and synthesis is enabled, otherwise the logging
/// stand-in.
pub fn synthesizer_from_config(config: &TtsConfig) -> Box<dyn SpeechSynthesizer> {
    match &config.command {
        Some(program) if config.enabled => {
            Box::new(CommandSynthesizer::new(program, &config.args))
        }
        _ => Box::new(LoggingSynthesizer::new()),
    }
}
