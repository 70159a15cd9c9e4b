//! Voice pipeline of the query form.
//!
//! Wires capture, narration and lifecycle handling together:
//! speak query → query field → analysis → narrated result

use crate::analysis::{AnalysisService, ResultPayload};
use crate::capture::{
    RecognitionErrorKind, RecognitionOutcome, SpeechInputSession, SpeechInputState,
};
use crate::config::Config;
use crate::error::{Result, VoiceError};
use crate::lifecycle::{LifecycleGuard, LifecycleSignal};
use crate::narration::{ResultAnnouncer, SpeechOutputController};
use crate::platform::{
    RecognitionEvent, SessionId, SpeechRecognizer, SpeechSynthesizer, SynthesisEvent, VoiceSource,
};
use crate::voice::{NameHeuristic, VoiceCatalog};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Platform speech capabilities, detected once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub input_supported: bool,
    pub output_supported: bool,
}

/// The form field holding the query text.
pub trait QueryField: Send + Sync {
    fn query(&self) -> String;
    fn set_query(&self, text: &str);
}

/// In-memory query field shared between the form and the pipeline.
#[derive(Debug, Clone, Default)]
pub struct SharedQueryField {
    text: Arc<Mutex<String>>,
}

impl SharedQueryField {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueryField for SharedQueryField {
    fn query(&self) -> String {
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_query(&self, text: &str) {
        *self.text.lock().unwrap_or_else(PoisonError::into_inner) = text.to_string();
    }
}

/// Voice input and output for one query form.
///
/// Platform callbacks are fed in through [`VoicePipeline::handle_recognition_event`]
/// and [`VoicePipeline::handle_synthesis_event`]. Dropping the pipeline stops
/// capture and narration.
pub struct VoicePipeline {
    input: SpeechInputSession,
    output: SpeechOutputController,
    announcer: ResultAnnouncer,
    lifecycle: LifecycleGuard,
    catalog: Arc<VoiceCatalog>,
    query: Arc<dyn QueryField>,
    capabilities: Capabilities,
    input_message: Option<String>,
    current_result: Option<ResultPayload>,
}

impl VoicePipeline {
    pub fn new(
        recognizer: Box<dyn SpeechRecognizer>,
        synthesizer: Box<dyn SpeechSynthesizer>,
        voices: Arc<dyn VoiceSource>,
        config: &Config,
        query: Arc<dyn QueryField>,
    ) -> Self {
        let input = SpeechInputSession::from_config(recognizer, &config.recognition);

        let catalog = VoiceCatalog::new(voices);
        let preference = Arc::new(NameHeuristic::from_config(&config.voices));
        let output =
            SpeechOutputController::with_preference(synthesizer, Arc::clone(&catalog), preference);
        // Voices may already be available; otherwise they arrive with VoicesChanged
        catalog.load();

        let capabilities = Capabilities {
            input_supported: input.is_supported(),
            output_supported: output.is_supported(),
        };
        info!(
            input = capabilities.input_supported,
            output = capabilities.output_supported,
            "voice capabilities"
        );

        Self {
            input,
            announcer: ResultAnnouncer::new(output.clone(), config.narration.clone()),
            lifecycle: LifecycleGuard::new(output.clone()),
            output,
            catalog,
            query,
            capabilities,
            input_message: None,
            current_result: None,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Start capture when idle, stop it while listening.
    ///
    /// Returns the session that was started, if any. Start failures are also
    /// shown through [`VoicePipeline::input_message`].
    pub fn toggle_capture(&mut self) -> Result<Option<SessionId>> {
        if self.input.is_listening() {
            self.input.stop();
            return Ok(None);
        }

        self.input_message = None;
        match self.input.start() {
            Ok(handle) => Ok(Some(handle.id())),
            Err(e) => {
                self.input_message = Some(message_for(&e));
                Err(e)
            }
        }
    }

    /// Feed a recognizer callback. A transcript replaces the query text.
    pub fn handle_recognition_event(
        &mut self,
        event: RecognitionEvent,
    ) -> Option<RecognitionOutcome> {
        let outcome = self.input.handle_event(event)?;
        match &outcome {
            RecognitionOutcome::Transcript(text) => {
                debug!(chars = text.len(), "transcript written to query field");
                self.query.set_query(text);
                self.input_message = None;
            }
            RecognitionOutcome::Error(kind) => {
                self.input_message = Some(kind.user_message());
            }
            RecognitionOutcome::Cancelled => {}
        }
        Some(outcome)
    }

    pub fn handle_synthesis_event(&self, event: SynthesisEvent) {
        self.output.handle_event(event);
    }

    /// Returns true if narration was stopped.
    pub fn handle_lifecycle(&self, signal: LifecycleSignal) -> bool {
        self.lifecycle.handle(signal)
    }

    /// Display `payload` as the current result and auto-announce it.
    ///
    /// Returns whether narration started.
    pub fn show_result(&mut self, payload: ResultPayload) -> bool {
        let announced = self.announcer.on_new_result(&payload);
        self.current_result = Some(payload);
        announced
    }

    /// Submit the query field's text and show the returned result.
    pub async fn submit_query(
        &mut self,
        service: &dyn AnalysisService,
        files: &[PathBuf],
        user_id: Option<&str>,
    ) -> Result<bool> {
        let query = self.query.query();
        let query = query.trim();
        if query.is_empty() {
            return Err(VoiceError::Analysis {
                message: "query is empty".to_string(),
            });
        }

        let payload = service.submit(query, files, user_id).await?;
        Ok(self.show_result(payload))
    }

    /// The narration control: stops narration while speaking, otherwise
    /// speaks the current result. Returns whether narration started.
    pub fn toggle_narration(&self) -> bool {
        if self.output.is_speaking() {
            self.output.stop();
            return false;
        }
        match &self.current_result {
            Some(result) => self.announcer.announce_now(result).is_some(),
            None => false,
        }
    }

    pub fn set_auto_announce(&self, enabled: bool) {
        self.announcer.set_auto_announce(enabled);
    }

    /// One-line capture error to show near the microphone control.
    pub fn input_message(&self) -> Option<&str> {
        self.input_message.as_deref()
    }

    pub fn current_result(&self) -> Option<&ResultPayload> {
        self.current_result.as_ref()
    }

    pub fn input_state(&self) -> SpeechInputState {
        self.input.state()
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.input.current_session()
    }

    pub fn output(&self) -> &SpeechOutputController {
        &self.output
    }

    pub fn catalog(&self) -> &Arc<VoiceCatalog> {
        &self.catalog
    }

    /// Stop capture and narration and release the catalog subscription.
    pub fn teardown(&mut self) {
        self.input.stop();
        self.lifecycle.teardown();
        self.output.shutdown();
    }
}

impl Drop for VoicePipeline {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn message_for(error: &VoiceError) -> String {
    match error {
        VoiceError::NotSupported { .. } => RecognitionErrorKind::NotSupported.user_message(),
        VoiceError::PermissionDenied => RecognitionErrorKind::PermissionDenied.user_message(),
        other => format!("Voice recognition failed: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ClauseRef, Justification, MockAnalysisService};
    use crate::platform::mock::{MockRecognizer, MockSynthesizer, SynthCall};
    use crate::voice::{Voice, VoiceId};
    use serde_json::json;

    struct Fixture {
        pipeline: VoicePipeline,
        recognizer: MockRecognizer,
        synth: MockSynthesizer,
        query: SharedQueryField,
    }

    fn fixture_with(recognizer: MockRecognizer, synth: MockSynthesizer) -> Fixture {
        let query = SharedQueryField::new();
        let pipeline = VoicePipeline::new(
            Box::new(recognizer.clone()),
            Box::new(synth.clone()),
            Arc::new(synth.clone()),
            &Config::default(),
            Arc::new(query.clone()),
        );
        Fixture {
            pipeline,
            recognizer,
            synth,
            query,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(
            MockRecognizer::new(),
            MockSynthesizer::new().with_voices(vec![
                Voice::new("v1", "Samantha", "en-US"),
                Voice::new("v2", "David", "en-US"),
            ]),
        )
    }

    fn result() -> ResultPayload {
        ResultPayload::new(
            "Approved",
            json!(25000),
            Justification {
                explanation: "Covered under hospitalisation".to_string(),
                clauses: vec![ClauseRef::new("In-patient care", "policy.pdf", json!(3))],
            },
        )
    }

    #[test]
    fn test_capabilities_detected_at_construction() {
        let f = fixture_with(MockRecognizer::unsupported(), MockSynthesizer::new());
        assert_eq!(
            f.pipeline.capabilities(),
            Capabilities {
                input_supported: false,
                output_supported: true,
            }
        );
    }

    #[test]
    fn test_transcript_fills_query_field() {
        let mut f = fixture();
        let session = f.pipeline.toggle_capture().unwrap().unwrap();

        f.pipeline
            .handle_recognition_event(RecognitionEvent::result(session, "is knee surgery covered"));
        f.pipeline
            .handle_recognition_event(RecognitionEvent::end(session));

        assert_eq!(f.query.query(), "is knee surgery covered");
        assert_eq!(f.pipeline.input_state(), SpeechInputState::Idle);
        assert_eq!(f.pipeline.input_message(), None);
    }

    #[test]
    fn test_permission_denied_sets_message_and_keeps_query() {
        let mut f = fixture();
        f.query.set_query("typed by hand");
        let session = f.pipeline.toggle_capture().unwrap().unwrap();

        f.pipeline
            .handle_recognition_event(RecognitionEvent::error(session, "not-allowed"));
        f.pipeline
            .handle_recognition_event(RecognitionEvent::end(session));

        assert_eq!(
            f.pipeline.input_message(),
            Some("Please allow microphone access to use voice recognition.")
        );
        assert_eq!(f.query.query(), "typed by hand");
        assert_eq!(f.pipeline.input_state(), SpeechInputState::Idle);
    }

    #[test]
    fn test_toggle_capture_twice_cancels() {
        let mut f = fixture();
        f.pipeline.toggle_capture().unwrap();
        assert_eq!(f.pipeline.toggle_capture().unwrap(), None);

        assert_eq!(f.recognizer.start_count(), 1);
        assert_eq!(f.recognizer.stop_count(), 1);
        assert_eq!(f.pipeline.input_state(), SpeechInputState::Finishing);
    }

    #[test]
    fn test_unsupported_capture_shows_message() {
        let mut f = fixture_with(MockRecognizer::unsupported(), MockSynthesizer::new());
        assert!(f.pipeline.toggle_capture().is_err());
        assert!(
            f.pipeline
                .input_message()
                .is_some_and(|m| m.contains("not supported"))
        );
    }

    #[test]
    fn test_show_result_announces_once() {
        let mut f = fixture();
        let payload = result();

        assert!(f.pipeline.show_result(payload.clone()));
        assert!(!f.pipeline.show_result(payload));

        assert_eq!(f.synth.spoken_texts().len(), 1);
        assert!(matches!(
            &f.synth.calls()[0],
            SynthCall::Speak { voice: Some(v), .. } if *v == VoiceId::from("v1")
        ));
    }

    #[test]
    fn test_toggle_narration() {
        let mut f = fixture();
        f.pipeline.set_auto_announce(false);
        assert!(!f.pipeline.toggle_narration(), "nothing to narrate yet");

        f.pipeline.show_result(result());
        assert!(f.synth.spoken_texts().is_empty());

        assert!(f.pipeline.toggle_narration());
        let id = f.pipeline.output().in_flight().unwrap();
        f.pipeline
            .handle_synthesis_event(SynthesisEvent::Started(id));
        assert!(f.pipeline.output().is_speaking());

        assert!(!f.pipeline.toggle_narration());
        assert!(!f.pipeline.output().is_speaking());
    }

    #[test]
    fn test_page_hidden_stops_narration() {
        let mut f = fixture();
        f.pipeline.show_result(result());
        let id = f.pipeline.output().in_flight().unwrap();
        f.pipeline
            .handle_synthesis_event(SynthesisEvent::Started(id));

        assert!(f.pipeline.handle_lifecycle(LifecycleSignal::PageHidden));
        assert!(!f.pipeline.output().is_speaking());
    }

    #[test]
    fn test_drop_stops_capture_and_narration() {
        let f = fixture();
        let (mut pipeline, recognizer, synth) = (f.pipeline, f.recognizer, f.synth);
        pipeline.toggle_capture().unwrap();
        pipeline.show_result(result());
        let catalog = Arc::clone(pipeline.catalog());

        drop(pipeline);

        assert_eq!(recognizer.stop_count(), 1);
        assert!(synth.cancel_count() >= 1);
        assert_eq!(catalog.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_query_shows_and_announces() {
        let mut f = fixture();
        f.query.set_query("  knee surgery, 3 month policy  ");
        let service = MockAnalysisService::new(result());

        let announced = f
            .pipeline
            .submit_query(&service, &[PathBuf::from("policy.pdf")], Some("user-1"))
            .await
            .unwrap();

        assert!(announced);
        assert_eq!(service.requests()[0].query, "knee surgery, 3 month policy");
        assert_eq!(f.pipeline.current_result().unwrap().decision, "Approved");
        assert!(f.synth.spoken_texts()[0].starts_with("Decision: Approved. Amount: ₹25000."));
    }

    #[tokio::test]
    async fn test_submit_empty_query_fails() {
        let mut f = fixture();
        let service = MockAnalysisService::new(result());
        assert!(matches!(
            f.pipeline.submit_query(&service, &[], None).await,
            Err(VoiceError::Analysis { .. })
        ));
        assert!(service.requests().is_empty());
    }
}
