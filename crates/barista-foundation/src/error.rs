use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Audio subsystem error: {0}")]
    Audio(#[from] AudioError),

    #[error("Dialogue error: {0}")]
    Dialog(#[from] DialogError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Shutdown requested")]
    ShutdownRequested,

    #[error("Fatal error, cannot recover: {0}")]
    Fatal(String),
}

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Device not found: {name:?}")]
    DeviceNotFound { name: Option<String> },

    #[error("Device disconnected")]
    DeviceDisconnected,

    #[error("Format not supported: {format}")]
    FormatNotSupported { format: String },

    #[error("Frame queue full, dropped block of {samples} samples")]
    QueueOverflow { samples: usize },

    #[error("No audio data for {duration:?}")]
    NoDataTimeout { duration: Duration },

    #[error("CPAL error: {0}")]
    Cpal(#[from] cpal::StreamError),

    #[error("Build stream error: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Play stream error: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Fatal error, cannot recover: {0}")]
    Fatal(String),
}

/// Dialogue-level failure taxonomy. All of these are survivable; the state
/// machine maps them to re-prompts or a fresh ask and carries on.
#[derive(Error, Debug)]
pub enum DialogError {
    #[error("No keyword match in transcript for category {category}")]
    RecognitionNoise { category: String },

    #[error("Neither yes nor no detected in confirmation")]
    AmbiguousConfirmation,

    #[error("Catalog entry no longer available: {name}")]
    UnknownCatalogEntry { name: String },

    #[error("Order delivery failed: {0}")]
    NotifierDelivery(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryStrategy {
    /// Re-speak the current prompt and stay in place.
    Reprompt,
    /// Abandon the pending selection and ask again from scratch.
    FreshAsk,
    /// Log and move on; the dialogue is unaffected.
    Ignore,
    /// Tear down and reopen the failing stream.
    Reopen,
    Fatal,
}

impl AppError {
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            AppError::Dialog(DialogError::RecognitionNoise { .. })
            | AppError::Dialog(DialogError::AmbiguousConfirmation) => RecoveryStrategy::Reprompt,
            AppError::Dialog(DialogError::UnknownCatalogEntry { .. }) => RecoveryStrategy::FreshAsk,
            AppError::Dialog(DialogError::NotifierDelivery(_)) => RecoveryStrategy::Ignore,
            AppError::Audio(AudioError::QueueOverflow { .. }) => RecoveryStrategy::Ignore,
            AppError::Audio(AudioError::DeviceDisconnected)
            | AppError::Audio(AudioError::NoDataTimeout { .. })
            | AppError::Audio(AudioError::Cpal(_)) => RecoveryStrategy::Reopen,
            AppError::Fatal(_) | AppError::ShutdownRequested => RecoveryStrategy::Fatal,
            _ => RecoveryStrategy::Fatal,
        }
    }
}
