//! queryvoice - voice input and result narration for document queries
//!
//! Platform speech engines are injected through the traits in [`platform`];
//! their callbacks are fed back as events and turned into state transitions.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod analysis;
pub mod capture;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod lifecycle;
#[cfg(feature = "cli")]
pub mod logging;
pub mod narration;
pub mod pipeline;
pub mod platform;
pub mod voice;

// Platform seams
pub use platform::{SpeechRecognizer, SpeechSynthesizer, VoiceSource};

// Components
pub use capture::{RecognitionErrorKind, RecognitionOutcome, SpeechInputSession};
pub use lifecycle::{LifecycleGuard, LifecycleSignal};
pub use narration::{ResultAnnouncer, SpeechOutputController, UtteranceRequest};
pub use pipeline::{Capabilities, QueryField, SharedQueryField, VoicePipeline};
pub use voice::{Voice, VoiceCatalog, VoiceId, VoicePreference};

// Results
pub use analysis::{AnalysisService, ResultPayload};

// Error handling
pub use error::{Result, VoiceError};

// Config
pub use config::Config;
