//! Stops narration when the page is hidden, unloaded or torn down.
//!
//! Best effort: an abrupt process exit runs no cleanup, which is fine since
//! no audio state is persisted.

use crate::narration::SpeechOutputController;
use tracing::debug;

/// Host page or component lifecycle signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleSignal {
    PageHidden,
    PageVisible,
    PageUnload,
    /// The component owning the pipeline is going away.
    Teardown,
}

impl LifecycleSignal {
    fn silences_output(self) -> bool {
        !matches!(self, LifecycleSignal::PageVisible)
    }
}

/// Watches lifecycle signals on behalf of a [`SpeechOutputController`].
///
/// Dropping the guard counts as a teardown signal.
pub struct LifecycleGuard {
    output: SpeechOutputController,
}

impl LifecycleGuard {
    pub fn new(output: SpeechOutputController) -> Self {
        Self { output }
    }

    /// React to `signal`. Returns true if narration was stopped.
    pub fn handle(&self, signal: LifecycleSignal) -> bool {
        if !signal.silences_output() || !self.output.is_speaking() {
            return false;
        }
        debug!(?signal, "stopping narration");
        self.output.stop();
        true
    }

    /// Teardown of the owning component.
    pub fn teardown(&self) -> bool {
        self.handle(LifecycleSignal::Teardown)
    }
}

impl Drop for LifecycleGuard {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration::UtteranceRequest;
    use crate::platform::SynthesisEvent;
    use crate::platform::mock::MockSynthesizer;
    use crate::voice::VoiceCatalog;
    use std::sync::Arc;

    fn speaking_controller(mock: &MockSynthesizer) -> SpeechOutputController {
        let catalog = VoiceCatalog::new(Arc::new(mock.clone()));
        let output = SpeechOutputController::new(Box::new(mock.clone()), catalog);
        let id = output.speak(UtteranceRequest::new("narration")).unwrap();
        output.handle_event(SynthesisEvent::Started(id));
        assert!(output.is_speaking());
        output
    }

    #[test]
    fn test_page_hidden_stops_narration() {
        let mock = MockSynthesizer::new();
        let output = speaking_controller(&mock);
        let guard = LifecycleGuard::new(output.clone());

        assert!(guard.handle(LifecycleSignal::PageHidden));
        assert!(!output.is_speaking());
        assert_eq!(mock.cancel_count(), 1);
    }

    #[test]
    fn test_page_unload_stops_narration() {
        let mock = MockSynthesizer::new();
        let output = speaking_controller(&mock);
        let guard = LifecycleGuard::new(output.clone());

        assert!(guard.handle(LifecycleSignal::PageUnload));
        assert!(!output.is_speaking());
    }

    #[test]
    fn test_page_visible_keeps_narration() {
        let mock = MockSynthesizer::new();
        let output = speaking_controller(&mock);
        let guard = LifecycleGuard::new(output.clone());

        assert!(!guard.handle(LifecycleSignal::PageVisible));
        assert!(output.is_speaking());
    }

    #[test]
    fn test_signal_while_idle_does_nothing() {
        let mock = MockSynthesizer::new();
        let catalog = VoiceCatalog::new(Arc::new(mock.clone()));
        let output = SpeechOutputController::new(Box::new(mock.clone()), catalog);
        let guard = LifecycleGuard::new(output);

        assert!(!guard.handle(LifecycleSignal::PageHidden));
        assert_eq!(mock.cancel_count(), 0);
    }

    #[test]
    fn test_drop_acts_as_teardown() {
        let mock = MockSynthesizer::new();
        let output = speaking_controller(&mock);
        drop(LifecycleGuard::new(output.clone()));
        assert!(!output.is_speaking());
    }
}
