//! Spoken query capture.

pub mod outcome;
pub mod session;

pub use outcome::{RecognitionErrorKind, RecognitionOutcome};
pub use session::{SessionHandle, SpeechInputSession, SpeechInputState};
