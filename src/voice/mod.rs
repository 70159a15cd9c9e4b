//! Synthesis voices: catalog and selection.

pub mod catalog;
pub mod selector;
pub mod types;

pub use catalog::{Unsubscribe, VoiceCatalog};
pub use selector::{NameHeuristic, VoicePreference, select};
pub use types::{Voice, VoiceId};
