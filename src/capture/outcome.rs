use crate::error::VoiceError;
use std::fmt;

/// Why a capture session produced no transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    /// The platform cannot capture speech.
    NotSupported,
    /// The user declined microphone access.
    PermissionDenied,
    /// Any other platform-reported error; the user may retry.
    Failed { code: String },
}

impl RecognitionErrorKind {
    /// Classify a platform error code.
    pub fn from_platform_code(code: &str) -> Self {
        match code {
            "not-allowed" | "service-not-allowed" => Self::PermissionDenied,
            other => Self::Failed {
                code: other.to_string(),
            },
        }
    }

    /// One-line message shown next to the microphone control.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotSupported => {
                "Voice recognition is not supported here. Please use a platform with speech support."
                    .to_string()
            }
            Self::PermissionDenied => {
                "Please allow microphone access to use voice recognition.".to_string()
            }
            Self::Failed { code } => format!("Voice recognition failed ({code}). Please try again."),
        }
    }
}

impl fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSupported => f.write_str("not supported"),
            Self::PermissionDenied => f.write_str("permission denied"),
            Self::Failed { code } => write!(f, "failed: {code}"),
        }
    }
}

impl From<RecognitionErrorKind> for VoiceError {
    fn from(kind: RecognitionErrorKind) -> Self {
        match kind {
            RecognitionErrorKind::NotSupported => VoiceError::not_supported("recognition"),
            RecognitionErrorKind::PermissionDenied => VoiceError::PermissionDenied,
            RecognitionErrorKind::Failed { code } => VoiceError::RecognitionFailed { message: code },
        }
    }
}

/// Terminal result of one capture session. Delivered exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionOutcome {
    Transcript(String),
    Error(RecognitionErrorKind),
    Cancelled,
}

impl RecognitionOutcome {
    pub fn transcript(&self) -> Option<&str> {
        match self {
            Self::Transcript(text) => Some(text),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&RecognitionErrorKind> {
        match self {
            Self::Error(kind) => Some(kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_codes_map_to_permission_denied() {
        assert_eq!(
            RecognitionErrorKind::from_platform_code("not-allowed"),
            RecognitionErrorKind::PermissionDenied
        );
        assert_eq!(
            RecognitionErrorKind::from_platform_code("service-not-allowed"),
            RecognitionErrorKind::PermissionDenied
        );
    }

    #[test]
    fn test_other_codes_map_to_failed() {
        assert_eq!(
            RecognitionErrorKind::from_platform_code("network"),
            RecognitionErrorKind::Failed {
                code: "network".to_string()
            }
        );
    }

    #[test]
    fn test_permission_message_is_actionable() {
        assert_eq!(
            RecognitionErrorKind::PermissionDenied.user_message(),
            "Please allow microphone access to use voice recognition."
        );
        assert!(
            RecognitionErrorKind::Failed {
                code: "audio-capture".to_string()
            }
            .user_message()
            .contains("audio-capture")
        );
    }

    #[test]
    fn test_into_voice_error() {
        let error: VoiceError = RecognitionErrorKind::PermissionDenied.into();
        assert!(matches!(error, VoiceError::PermissionDenied));
        let error: VoiceError = RecognitionErrorKind::NotSupported.into();
        assert!(matches!(error, VoiceError::NotSupported { .. }));
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = RecognitionOutcome::Transcript("hello".to_string());
        assert_eq!(outcome.transcript(), Some("hello"));
        assert!(outcome.error().is_none());
        assert_eq!(RecognitionOutcome::Cancelled.transcript(), None);
    }
}
