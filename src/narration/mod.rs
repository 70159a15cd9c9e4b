//! Spoken narration of results.

pub mod announcer;
pub mod controller;
pub mod utterance;

pub use announcer::{ResultAnnouncer, narration_text};
pub use controller::{SpeechOutputController, SpeechOutputState};
pub use utterance::UtteranceRequest;
