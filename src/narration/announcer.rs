//! Automatic narration of analysis results.

use crate::analysis::{ResultId, ResultPayload};
use crate::config::NarrationConfig;
use crate::narration::controller::SpeechOutputController;
use crate::narration::utterance::UtteranceRequest;
use crate::platform::UtteranceId;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Build the spoken form of a result.
///
/// `Decision: … Amount: … Justification: … Supporting clauses: Clause 1: …`,
/// with clauses joined by `". "`.
pub fn narration_text(payload: &ResultPayload, currency: &str) -> String {
    let clauses = payload
        .justification
        .clauses
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            format!(
                "Clause {}: {} from document {} page {}",
                idx + 1,
                c.clause,
                c.document,
                c.page
            )
        })
        .collect::<Vec<_>>()
        .join(". ");

    format!(
        "Decision: {}. Amount: {}{}. Justification: {}. Supporting clauses: {}",
        payload.decision, currency, payload.amount, payload.justification.explanation, clauses
    )
}

#[derive(Debug)]
struct AnnouncerState {
    auto_announce: bool,
    /// The result most recently narrated.
    last_announced: Option<ResultId>,
}

/// Narrates each new result once.
///
/// Identity comes from [`ResultPayload::id`], so re-rendering the same
/// result (a clone of the payload) never narrates it again.
pub struct ResultAnnouncer {
    output: SpeechOutputController,
    config: NarrationConfig,
    state: Mutex<AnnouncerState>,
}

impl ResultAnnouncer {
    pub fn new(output: SpeechOutputController, config: NarrationConfig) -> Self {
        let auto_announce = config.auto_announce;
        Self {
            output,
            config,
            state: Mutex::new(AnnouncerState {
                auto_announce,
                last_announced: None,
            }),
        }
    }

    /// Called whenever a result is shown. Returns whether narration started.
    pub fn on_new_result(&self, payload: &ResultPayload) -> bool {
        if !self.output.is_supported() {
            return false;
        }

        let id = payload.id();
        {
            // Check-and-mark under one lock so concurrent triggers narrate once
            let mut state = self.state();
            if !state.auto_announce {
                debug!(result = %id, "auto-announce disabled, skipping");
                return false;
            }
            if state.last_announced == Some(id) {
                debug!(result = %id, "result already announced");
                return false;
            }
            state.last_announced = Some(id);
        }

        self.output
            .speak_announcement(self.request_for(payload), id)
            .is_some()
    }

    /// Narrate `payload` now, regardless of earlier announcements.
    pub fn announce_now(&self, payload: &ResultPayload) -> Option<UtteranceId> {
        let id = payload.id();
        self.state().last_announced = Some(id);
        self.output.speak_announcement(self.request_for(payload), id)
    }

    pub fn set_auto_announce(&self, enabled: bool) {
        self.state().auto_announce = enabled;
    }

    pub fn auto_announce(&self) -> bool {
        self.state().auto_announce
    }

    /// Whether `id` is the most recently announced result.
    pub fn has_announced(&self, id: ResultId) -> bool {
        self.state().last_announced == Some(id)
    }

    fn request_for(&self, payload: &ResultPayload) -> UtteranceRequest {
        UtteranceRequest::from_config(
            narration_text(payload, &self.config.currency),
            &self.config,
        )
    }

    fn state(&self) -> MutexGuard<'_, AnnouncerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
