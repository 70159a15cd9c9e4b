use crate::config::NarrationConfig;
use crate::defaults;
use crate::voice::Voice;

/// One request to synthesize and play a text.
///
/// Built fresh for every narration and not modified once submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct UtteranceRequest {
    pub text: String,
    pub language_tag: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Explicit voice. When `None` the controller picks one from the catalog.
    pub voice: Option<Voice>,
}

impl UtteranceRequest {
    /// Request with the default narration parameters.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language_tag: defaults::LANGUAGE.to_string(),
            rate: defaults::SPEECH_RATE,
            pitch: defaults::SPEECH_PITCH,
            volume: defaults::SPEECH_VOLUME,
            voice: None,
        }
    }

    /// Request using the configured narration parameters.
    pub fn from_config(text: impl Into<String>, config: &NarrationConfig) -> Self {
        Self {
            text: text.into(),
            language_tag: config.language.clone(),
            rate: config.rate,
            pitch: config.pitch,
            volume: config.volume,
            voice: None,
        }
    }

    pub fn with_language(mut self, language_tag: impl Into<String>) -> Self {
        self.language_tag = language_tag.into();
        self
    }

    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voice = Some(voice);
        self
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }
}
