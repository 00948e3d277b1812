//! Error types for synthesis

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TtsError {
    #[error("TTS engine not available: {0}")]
    EngineNotAvailable(String),

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Invalid text input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TtsResult<T> = Result<T, TtsError>;
