//! Platform speech capabilities.
//!
//! The crate never touches audio devices. Capture and synthesis are provided
//! by the host through these traits, and their asynchronous completions are
//! fed back as [`RecognitionEvent`] / [`SynthesisEvent`] values.

pub mod mock;

use crate::error::Result;
use crate::narration::utterance::UtteranceRequest;
use crate::voice::Voice;
use std::fmt;
use std::sync::Arc;

/// Identifies one capture session across recognizer callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Identifies one submitted utterance across synthesizer callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub u64);

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utterance-{}", self.0)
    }
}

/// Parameters of a single capture request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionRequest {
    pub language_tag: String,
    /// Keep listening after the first utterance.
    pub continuous: bool,
    /// Report partial hypotheses while the user speaks.
    pub interim_results: bool,
}

impl RecognitionRequest {
    /// One final transcription of a single utterance.
    pub fn single_utterance(language_tag: impl Into<String>) -> Self {
        Self {
            language_tag: language_tag.into(),
            continuous: false,
            interim_results: false,
        }
    }
}

/// Source of the installed synthesis voices.
pub trait VoiceSource: Send + Sync {
    /// Current voice list. May be empty until the platform has loaded it.
    fn voices(&self) -> Vec<Voice>;
}

impl<T: VoiceSource> VoiceSource for Arc<T> {
    fn voices(&self) -> Vec<Voice> {
        (**self).voices()
    }
}

/// Speech-to-text capture provided by the platform.
///
/// Calls return immediately; progress is reported later through
/// [`RecognitionEvent`]s tagged with the session id passed to `start`.
pub trait SpeechRecognizer: Send {
    /// Whether the platform can capture speech at all.
    fn is_supported(&self) -> bool;

    /// Begin capturing for `session`.
    fn start(&mut self, session: SessionId, request: &RecognitionRequest) -> Result<()>;

    /// Ask the platform to stop capturing. Events may still arrive afterwards.
    fn stop(&mut self);
}

/// Text-to-speech playback provided by the platform.
///
/// Calls return immediately; playback progress is reported later through
/// [`SynthesisEvent`]s tagged with the utterance id passed to `speak`.
pub trait SpeechSynthesizer: Send {
    /// Whether the platform can synthesize speech at all.
    fn is_supported(&self) -> bool;

    /// Queue `request` for playback, optionally with a specific voice.
    fn speak(
        &mut self,
        id: UtteranceId,
        request: &UtteranceRequest,
        voice: Option<&Voice>,
    ) -> Result<()>;

    /// Change the voice of an utterance that has not started playing yet.
    fn assign_voice(&mut self, id: UtteranceId, voice: &Voice) -> Result<()>;

    /// Drop everything queued or playing.
    fn cancel(&mut self);
}

/// Callback from the platform recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionEvent {
    pub session: SessionId,
    pub kind: RecognitionEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEventKind {
    /// Audio capture began.
    Started,
    /// Final transcript of the utterance.
    Result(String),
    /// Platform error code (e.g. `not-allowed`, `network`).
    Error(String),
    /// Capture finished, with or without a result.
    End,
}

impl RecognitionEvent {
    pub fn started(session: SessionId) -> Self {
        Self {
            session,
            kind: RecognitionEventKind::Started,
        }
    }

    pub fn result(session: SessionId, transcript: impl Into<String>) -> Self {
        Self {
            session,
            kind: RecognitionEventKind::Result(transcript.into()),
        }
    }

    pub fn error(session: SessionId, code: impl Into<String>) -> Self {
        Self {
            session,
            kind: RecognitionEventKind::Error(code.into()),
        }
    }

    pub fn end(session: SessionId) -> Self {
        Self {
            session,
            kind: RecognitionEventKind::End,
        }
    }
}

/// Callback from the platform synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisEvent {
    /// Playback of the utterance began.
    Started(UtteranceId),
    /// Playback finished normally or after cancellation.
    Ended(UtteranceId),
    /// Playback failed.
    Error { id: UtteranceId, message: String },
    /// The installed voice list changed.
    VoicesChanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_utterance_request() {
        let request = RecognitionRequest::single_utterance("en-US");
        assert_eq!(request.language_tag, "en-US");
        assert!(!request.continuous);
        assert!(!request.interim_results);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(SessionId(3).to_string(), "session-3");
        assert_eq!(UtteranceId(7).to_string(), "utterance-7");
    }

    #[test]
    fn test_recognition_event_constructors() {
        let session = SessionId(1);
        assert_eq!(
            RecognitionEvent::result(session, "hello").kind,
            RecognitionEventKind::Result("hello".to_string())
        );
        assert_eq!(
            RecognitionEvent::error(session, "network").kind,
            RecognitionEventKind::Error("network".to_string())
        );
        assert_eq!(RecognitionEvent::end(session).session, session);
    }
}
