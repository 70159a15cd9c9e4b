//! Single-flight speech output.
//!
//! At most one utterance is in flight at any time. Every `speak` cancels the
//! previous utterance before submitting the next one, and callbacks that
//! belong to a superseded utterance are ignored, so only the most recent
//! request can ever be reported as speaking.

use crate::analysis::ResultId;
use crate::narration::utterance::UtteranceRequest;
use crate::platform::{SpeechSynthesizer, SynthesisEvent, UtteranceId};
use crate::voice::{NameHeuristic, Unsubscribe, Voice, VoiceCatalog, VoicePreference};
use crossbeam_channel::{Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, info, warn};

/// Playback state reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeechOutputState {
    #[default]
    Idle,
    Speaking,
}

#[derive(Debug)]
struct InFlight {
    id: UtteranceId,
    language_tag: String,
    /// Submitted without a voice because the catalog was still empty.
    awaiting_voice: bool,
    announcement: Option<ResultId>,
}

struct OutputInner {
    synth: Box<dyn SpeechSynthesizer>,
    state: SpeechOutputState,
    in_flight: Option<InFlight>,
    next_id: u64,
    observers: Vec<Sender<SpeechOutputState>>,
}

impl OutputInner {
    fn next_utterance_id(&mut self) -> UtteranceId {
        self.next_id += 1;
        UtteranceId(self.next_id)
    }

    fn set_state(&mut self, state: SpeechOutputState) {
        if self.state == state {
            return;
        }
        debug!(from = ?self.state, to = ?state, "speech output state changed");
        self.state = state;
        self.observers.retain(|tx| tx.send(state).is_ok());
    }

    fn cancel_in_flight(&mut self) -> bool {
        let cancelled = self.in_flight.take();
        if let Some(ref utterance) = cancelled {
            debug!(id = %utterance.id, "cancelling in-flight utterance");
            self.synth.cancel();
        }
        self.set_state(SpeechOutputState::Idle);
        cancelled.is_some()
    }

    fn finish(&mut self, id: UtteranceId) {
        if self.in_flight.as_ref().is_some_and(|u| u.id == id) {
            self.in_flight = None;
            self.set_state(SpeechOutputState::Idle);
        } else {
            debug!(%id, "ignoring end of superseded utterance");
        }
    }

    // One attempt only; the flag is cleared whether or not a voice matched.
    fn assign_late_voice(&mut self, voices: &[Voice], preference: &dyn VoicePreference) {
        let Some(utterance) = self.in_flight.as_mut() else {
            return;
        };
        if !utterance.awaiting_voice || voices.is_empty() {
            return;
        }
        utterance.awaiting_voice = false;
        let id = utterance.id;
        let Some(voice) = preference.select(voices, &utterance.language_tag) else {
            info!(%id, "no preferred voice found, keeping platform default");
            return;
        };
        match self.synth.assign_voice(id, &voice) {
            Ok(()) => info!(%id, voice = %voice, "assigned voice after catalog load"),
            Err(e) => warn!(%id, error = %e, "failed to assign voice"),
        }
    }
}

struct Shared {
    inner: Mutex<OutputInner>,
    catalog: Arc<VoiceCatalog>,
    preference: Arc<dyn VoicePreference>,
    supported: bool,
    subscription: Mutex<Option<Unsubscribe>>,
}

impl Shared {
    fn inner(&self) -> MutexGuard<'_, OutputInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owns the platform synthesizer and the one utterance in flight.
///
/// Cloning yields another handle to the same controller.
#[derive(Clone)]
pub struct SpeechOutputController {
    shared: Arc<Shared>,
}

impl SpeechOutputController {
    /// Controller using the built-in voice name heuristic.
    pub fn new(synth: Box<dyn SpeechSynthesizer>, catalog: Arc<VoiceCatalog>) -> Self {
        Self::with_preference(synth, catalog, Arc::new(NameHeuristic::default()))
    }

    /// Controller using a custom voice selection strategy.
    pub fn with_preference(
        synth: Box<dyn SpeechSynthesizer>,
        catalog: Arc<VoiceCatalog>,
        preference: Arc<dyn VoicePreference>,
    ) -> Self {
        let supported = synth.is_supported();
        if !supported {
            info!("speech synthesis not supported, narration disabled");
        }

        let shared = Arc::new(Shared {
            inner: Mutex::new(OutputInner {
                synth,
                state: SpeechOutputState::Idle,
                in_flight: None,
                next_id: 0,
                observers: Vec::new(),
            }),
            catalog: Arc::clone(&catalog),
            preference,
            supported,
            subscription: Mutex::new(None),
        });

        let weak: Weak<Shared> = Arc::downgrade(&shared);
        let subscription = catalog.subscribe(move |voices| {
            if let Some(shared) = weak.upgrade() {
                shared
                    .inner()
                    .assign_late_voice(voices, shared.preference.as_ref());
            }
        });
        *shared
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(subscription);

        Self { shared }
    }

    /// Whether the platform can synthesize speech.
    pub fn is_supported(&self) -> bool {
        self.shared.supported
    }

    /// Speak `request`, superseding anything in flight.
    ///
    /// Returns `None` when output is unsupported or the platform rejected
    /// the request; both are logged and leave the controller idle.
    pub fn speak(&self, request: UtteranceRequest) -> Option<UtteranceId> {
        self.submit(request, None)
    }

    /// Like [`speak`](Self::speak), remembering which result is being narrated.
    pub fn speak_announcement(
        &self,
        request: UtteranceRequest,
        result: ResultId,
    ) -> Option<UtteranceId> {
        self.submit(request, Some(result))
    }

    fn submit(&self, request: UtteranceRequest, announcement: Option<ResultId>) -> Option<UtteranceId> {
        if !self.shared.supported {
            debug!("speech output unsupported, skipping utterance");
            return None;
        }

        let catalog = &self.shared.catalog;
        let mut voices = catalog.current();
        if request.voice.is_none() && voices.is_empty() {
            catalog.load();
            voices = catalog.current();
        }

        let voice = match request.voice.clone() {
            Some(voice) => Some(voice),
            None => {
                let selected = self
                    .shared
                    .preference
                    .select(&voices, &request.language_tag);
                match &selected {
                    Some(voice) => info!(voice = %voice, "selected narration voice"),
                    None => info!("no preferred voice found, using platform default"),
                }
                selected
            }
        };
        let awaiting_voice = voice.is_none() && voices.is_empty();

        let mut inner = self.shared.inner();
        inner.cancel_in_flight();
        let id = inner.next_utterance_id();

        if let Err(e) = inner.synth.speak(id, &request, voice.as_ref()) {
            warn!(%id, error = %e, "speech synthesis failed");
            return None;
        }
        debug!(%id, chars = request.text.len(), "utterance submitted");
        inner.in_flight = Some(InFlight {
            id,
            language_tag: request.language_tag,
            awaiting_voice,
            announcement,
        });

        // The catalog may have filled in while this request was being prepared
        if awaiting_voice {
            let now = catalog.current();
            inner.assign_late_voice(&now, self.shared.preference.as_ref());
        }
        Some(id)
    }

    /// Stop narration. Does nothing when nothing is in flight.
    pub fn stop(&self) {
        let mut inner = self.shared.inner();
        if inner.in_flight.is_none() {
            return;
        }
        inner.cancel_in_flight();
    }

    /// Feed a synthesizer callback into the state machine.
    pub fn handle_event(&self, event: SynthesisEvent) {
        match event {
            SynthesisEvent::VoicesChanged => {
                // Catalog listeners lock the controller, so no lock is held here
                self.shared.catalog.on_voices_changed();
            }
            SynthesisEvent::Started(id) => {
                let mut inner = self.shared.inner();
                if inner.in_flight.as_ref().is_some_and(|u| u.id == id) {
                    inner.set_state(SpeechOutputState::Speaking);
                } else {
                    debug!(%id, "ignoring start of superseded utterance");
                }
            }
            SynthesisEvent::Ended(id) => {
                self.shared.inner().finish(id);
            }
            SynthesisEvent::Error { id, message } => {
                warn!(%id, %message, "speech synthesis error");
                self.shared.inner().finish(id);
            }
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.state() == SpeechOutputState::Speaking
    }

    pub fn state(&self) -> SpeechOutputState {
        self.shared.inner().state
    }

    /// Id of the utterance currently queued or playing.
    pub fn in_flight(&self) -> Option<UtteranceId> {
        self.shared.inner().in_flight.as_ref().map(|u| u.id)
    }

    /// Whether the utterance in flight narrates `result`.
    pub fn is_announcing(&self, result: ResultId) -> bool {
        self.shared
            .inner()
            .in_flight
            .as_ref()
            .is_some_and(|u| u.announcement == Some(result))
    }

    /// Receive every subsequent state transition.
    pub fn on_state_change(&self) -> Receiver<SpeechOutputState> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.shared.inner().observers.push(tx);
        rx
    }

    /// Stop narration and detach from the voice catalog.
    pub fn shutdown(&self) {
        self.stop();
        let subscription = self
            .shared
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
    }
}
