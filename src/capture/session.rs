//! Capture-and-transcribe state machine.
//!
//! `Idle -> Listening -> Finishing -> Idle`. Each session delivers exactly
//! one [`RecognitionOutcome`] through its handle; callbacks arriving after
//! the outcome, or for an older session, are discarded.

use crate::capture::outcome::{RecognitionErrorKind, RecognitionOutcome};
use crate::config::RecognitionConfig;
use crate::defaults;
use crate::error::{Result, VoiceError};
use crate::platform::{
    RecognitionEvent, RecognitionEventKind, RecognitionRequest, SessionId, SpeechRecognizer,
};
use crossbeam_channel::{Receiver, Sender};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeechInputState {
    #[default]
    Idle,
    Listening,
    /// Outcome delivered; waiting for the platform to report the end.
    Finishing,
}

/// Caller's view of one capture session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    outcome: Receiver<RecognitionOutcome>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The outcome, if it has been delivered and not yet taken.
    pub fn try_outcome(&self) -> Option<RecognitionOutcome> {
        self.outcome.try_recv().ok()
    }

    /// Block up to `timeout` for the outcome.
    pub fn wait_outcome(&self, timeout: Duration) -> Option<RecognitionOutcome> {
        self.outcome.recv_timeout(timeout).ok()
    }

    pub fn receiver(&self) -> &Receiver<RecognitionOutcome> {
        &self.outcome
    }
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SessionHandle {}

struct ActiveSession {
    handle: SessionHandle,
    /// Taken when the outcome is delivered.
    outcome_tx: Option<Sender<RecognitionOutcome>>,
}

/// Owns the platform recognizer and at most one capture session.
pub struct SpeechInputSession {
    recognizer: Box<dyn SpeechRecognizer>,
    language_tag: String,
    supported: bool,
    state: SpeechInputState,
    active: Option<ActiveSession>,
    next_id: u64,
}

impl SpeechInputSession {
    pub fn new(recognizer: Box<dyn SpeechRecognizer>, language_tag: impl Into<String>) -> Self {
        let supported = recognizer.is_supported();
        Self {
            recognizer,
            language_tag: language_tag.into(),
            supported,
            state: SpeechInputState::Idle,
            active: None,
            next_id: 0,
        }
    }

    pub fn from_config(recognizer: Box<dyn SpeechRecognizer>, config: &RecognitionConfig) -> Self {
        Self::new(recognizer, config.language.clone())
    }

    /// Capture support, checked once at construction.
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn state(&self) -> SpeechInputState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == SpeechInputState::Listening
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.active.as_ref().map(|a| a.handle.id)
    }

    /// Start capturing one utterance.
    ///
    /// While already listening this returns the existing handle without
    /// touching the platform.
    pub fn start(&mut self) -> Result<SessionHandle> {
        if !self.supported {
            return Err(VoiceError::from(RecognitionErrorKind::NotSupported));
        }
        if self.state == SpeechInputState::Listening
            && let Some(active) = &self.active
        {
            debug!(session = %active.handle.id, "already listening");
            return Ok(active.handle.clone());
        }

        self.next_id += 1;
        let id = SessionId(self.next_id);
        let request = RecognitionRequest::single_utterance(self.language_tag.as_str());
        if let Err(e) = self.recognizer.start(id, &request) {
            warn!(session = %id, error = %e, "failed to start speech recognition");
            return Err(e);
        }

        let (outcome_tx, outcome) = crossbeam_channel::bounded(1);
        let handle = SessionHandle { id, outcome };
        self.active = Some(ActiveSession {
            handle: handle.clone(),
            outcome_tx: Some(outcome_tx),
        });
        self.state = SpeechInputState::Listening;
        debug!(session = %id, language = %self.language_tag, "listening");
        Ok(handle)
    }

    /// Cancel the current capture. The session ends with `Cancelled`.
    pub fn stop(&mut self) {
        if self.state != SpeechInputState::Listening {
            return;
        }
        self.recognizer.stop();
        self.deliver(RecognitionOutcome::Cancelled);
        self.state = SpeechInputState::Finishing;
    }

    /// Feed a recognizer callback into the state machine.
    ///
    /// Returns the outcome if this event produced it.
    pub fn handle_event(&mut self, event: RecognitionEvent) -> Option<RecognitionOutcome> {
        if self.current_session() != Some(event.session) {
            debug!(session = %event.session, "discarding event for stale session");
            return None;
        }

        match event.kind {
            RecognitionEventKind::Started => {
                debug!(session = %event.session, "capture started");
                None
            }
            RecognitionEventKind::Result(text) => {
                if self.state != SpeechInputState::Listening {
                    debug!(session = %event.session, "discarding late transcript");
                    return None;
                }
                self.state = SpeechInputState::Finishing;
                self.deliver(RecognitionOutcome::Transcript(text))
            }
            RecognitionEventKind::Error(code) => {
                warn!(session = %event.session, %code, "speech recognition error");
                if self.state != SpeechInputState::Listening {
                    return None;
                }
                self.state = SpeechInputState::Finishing;
                let kind = RecognitionErrorKind::from_platform_code(&code);
                self.deliver(RecognitionOutcome::Error(kind))
            }
            RecognitionEventKind::End => {
                let outcome = if self.state == SpeechInputState::Listening {
                    self.deliver(RecognitionOutcome::Error(RecognitionErrorKind::Failed {
                        code: defaults::NO_SPEECH_CODE.to_string(),
                    }))
                } else {
                    None
                };
                self.state = SpeechInputState::Idle;
                self.active = None;
                debug!(session = %event.session, "capture ended");
                outcome
            }
        }
    }

    fn deliver(&mut self, outcome: RecognitionOutcome) -> Option<RecognitionOutcome> {
        let tx = self.active.as_mut()?.outcome_tx.take()?;
        // The caller may have dropped its handle; the outcome is still returned
        tx.try_send(outcome.clone()).ok();
        Some(outcome)
    }
}

impl Drop for SpeechInputSession {
    fn drop(&mut self) {
        if self.state == SpeechInputState::Listening {
            self.recognizer.stop();
        }
    }
}
