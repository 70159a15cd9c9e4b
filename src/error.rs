//! Error types for queryvoice.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    // Speech capability errors
    #[error("Speech {capability} is not supported on this platform")]
    NotSupported { capability: String },

    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("Speech recognition failed: {message}")]
    RecognitionFailed { message: String },

    #[error("Speech synthesis failed: {message}")]
    SynthesisFailed { message: String },

    // Analysis service errors
    #[error("Analysis request failed: {message}")]
    Analysis { message: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl VoiceError {
    /// Shorthand for a `NotSupported` error naming the missing capability.
    pub fn not_supported(capability: &str) -> Self {
        VoiceError::NotSupported {
            capability: capability.to_string(),
        }
    }

    /// True for errors that leave the pipeline usable (the user may retry).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            VoiceError::PermissionDenied
                | VoiceError::RecognitionFailed { .. }
                | VoiceError::SynthesisFailed { .. }
                | VoiceError::Analysis { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, VoiceError>;
