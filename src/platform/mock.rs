//! In-memory platform implementations for tests and headless use.
//!
//! Both mocks are cheap to clone; clones share state, so a test can keep one
//! copy for inspection after handing another to a controller.

use crate::error::{Result, VoiceError};
use crate::narration::utterance::UtteranceRequest;
use crate::platform::{
    RecognitionRequest, SessionId, SpeechRecognizer, SpeechSynthesizer, UtteranceId, VoiceSource,
};
use crate::voice::{Voice, VoiceId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A call received by [`MockSynthesizer`].
#[derive(Debug, Clone, PartialEq)]
pub enum SynthCall {
    Speak {
        id: UtteranceId,
        text: String,
        voice: Option<VoiceId>,
    },
    AssignVoice {
        id: UtteranceId,
        voice: VoiceId,
    },
    Cancel,
}

#[derive(Debug)]
struct SynthState {
    supported: bool,
    fail_speak: bool,
    voices: Vec<Voice>,
    calls: Vec<SynthCall>,
}

/// Mock synthesizer that records calls and serves a mutable voice list.
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    state: Arc<Mutex<SynthState>>,
}

impl MockSynthesizer {
    /// Create a supported synthesizer with no voices loaded yet
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SynthState {
                supported: true,
                fail_speak: false,
                voices: Vec::new(),
                calls: Vec::new(),
            })),
        }
    }

    /// Create a synthesizer that reports no platform support
    pub fn unsupported() -> Self {
        let mock = Self::new();
        lock(&mock.state).supported = false;
        mock
    }

    /// Configure the voices reported from the start
    pub fn with_voices(self, voices: Vec<Voice>) -> Self {
        lock(&self.state).voices = voices;
        self
    }

    /// Configure `speak` to fail synchronously
    pub fn with_speak_failure(self) -> Self {
        lock(&self.state).fail_speak = true;
        self
    }

    /// Simulate the platform finishing its asynchronous voice load.
    pub fn install_voices(&self, voices: Vec<Voice>) {
        lock(&self.state).voices.extend(voices);
    }

    /// All calls received so far, in order
    pub fn calls(&self) -> Vec<SynthCall> {
        lock(&self.state).calls.clone()
    }

    /// Texts passed to `speak`, in order
    pub fn spoken_texts(&self) -> Vec<String> {
        lock(&self.state)
            .calls
            .iter()
            .filter_map(|call| match call {
                SynthCall::Speak { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of `cancel` calls received
    pub fn cancel_count(&self) -> usize {
        lock(&self.state)
            .calls
            .iter()
            .filter(|call| matches!(call, SynthCall::Cancel))
            .count()
    }
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceSource for MockSynthesizer {
    fn voices(&self) -> Vec<Voice> {
        lock(&self.state).voices.clone()
    }
}

impl SpeechSynthesizer for MockSynthesizer {
    fn is_supported(&self) -> bool {
        lock(&self.state).supported
    }

    fn speak(
        &mut self,
        id: UtteranceId,
        request: &UtteranceRequest,
        voice: Option<&Voice>,
    ) -> Result<()> {
        let mut state = lock(&self.state);
        if state.fail_speak {
            return Err(VoiceError::SynthesisFailed {
                message: "mock synthesis failure".to_string(),
            });
        }
        state.calls.push(SynthCall::Speak {
            id,
            text: request.text.clone(),
            voice: voice.map(|v| v.id.clone()),
        });
        Ok(())
    }

    fn assign_voice(&mut self, id: UtteranceId, voice: &Voice) -> Result<()> {
        lock(&self.state).calls.push(SynthCall::AssignVoice {
            id,
            voice: voice.id.clone(),
        });
        Ok(())
    }

    fn cancel(&mut self) {
        lock(&self.state).calls.push(SynthCall::Cancel);
    }
}

/// A call received by [`MockRecognizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerCall {
    Start {
        session: SessionId,
        request: RecognitionRequest,
    },
    Stop,
}

#[derive(Debug)]
struct RecognizerState {
    supported: bool,
    fail_start: bool,
    calls: Vec<RecognizerCall>,
}

/// Mock recognizer that records start/stop calls.
#[derive(Debug, Clone)]
pub struct MockRecognizer {
    state: Arc<Mutex<RecognizerState>>,
}

impl MockRecognizer {
    /// Create a supported recognizer
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RecognizerState {
                supported: true,
                fail_start: false,
                calls: Vec::new(),
            })),
        }
    }

    /// Create a recognizer that reports no platform support
    pub fn unsupported() -> Self {
        let mock = Self::new();
        lock(&mock.state).supported = false;
        mock
    }

    /// Configure `start` to fail synchronously
    pub fn with_start_failure(self) -> Self {
        lock(&self.state).fail_start = true;
        self
    }

    /// All calls received so far, in order
    pub fn calls(&self) -> Vec<RecognizerCall> {
        lock(&self.state).calls.clone()
    }

    /// Number of platform captures started
    pub fn start_count(&self) -> usize {
        lock(&self.state)
            .calls
            .iter()
            .filter(|call| matches!(call, RecognizerCall::Start { .. }))
            .count()
    }

    /// Number of stop requests received
    pub fn stop_count(&self) -> usize {
        lock(&self.state)
            .calls
            .iter()
            .filter(|call| matches!(call, RecognizerCall::Stop))
            .count()
    }
}

impl Default for MockRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechRecognizer for MockRecognizer {
    fn is_supported(&self) -> bool {
        lock(&self.state).supported
    }

    fn start(&mut self, session: SessionId, request: &RecognitionRequest) -> Result<()> {
        let mut state = lock(&self.state);
        if state.fail_start {
            return Err(VoiceError::RecognitionFailed {
                message: "mock capture failure".to_string(),
            });
        }
        state.calls.push(RecognizerCall::Start {
            session,
            request: request.clone(),
        });
        Ok(())
    }

    fn stop(&mut self) {
        lock(&self.state).calls.push(RecognizerCall::Stop);
    }
}
