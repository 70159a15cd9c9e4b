//! Synthesis voice descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque platform identifier of a synthesis voice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VoiceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A voice the platform can synthesize with.
///
/// Voices are owned by the platform; the crate only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    pub id: VoiceId,
    pub display_name: String,
    #[serde(alias = "lang")]
    pub language_tag: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Voice {
    /// Creates a non-default voice.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        language_tag: impl Into<String>,
    ) -> Self {
        Self {
            id: VoiceId::new(id),
            display_name: display_name.into(),
            language_tag: language_tag.into(),
            is_default: false,
        }
    }

    /// Marks the voice as the platform default.
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Case-insensitive language tag comparison (`en-us` equals `en-US`).
    pub fn speaks(&self, language_tag: &str) -> bool {
        self.language_tag.eq_ignore_ascii_case(language_tag)
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.language_tag)
    }
}
