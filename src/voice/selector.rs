//! Voice selection heuristic.
//!
//! The platform rarely exposes voice characteristics, so the preferred voice
//! is picked by matching display names against curated given-name lists.
//! Unlisted names can be misclassified; callers fall back to the platform
//! default voice when nothing matches.

use crate::config::VoicesConfig;
use crate::defaults;
use crate::voice::Voice;

/// Strategy for choosing a narration voice from the catalog.
///
/// Implementations must be deterministic: the same catalog and language tag
/// always yield the same voice.
pub trait VoicePreference: Send + Sync {
    /// Pick a voice, or `None` to use the platform default.
    fn select(&self, catalog: &[Voice], language_tag: &str) -> Option<Voice>;
}

/// Name-list heuristic preferring feminine-associated voice names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameHeuristic {
    preferred: Vec<String>,
    excluded: Vec<String>,
}

impl NameHeuristic {
    /// Builds the heuristic from name fragments (matched case-insensitively).
    pub fn new<P, E>(preferred: P, excluded: E) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            preferred: normalize(preferred),
            excluded: normalize(excluded),
        }
    }

    pub fn from_config(config: &VoicesConfig) -> Self {
        Self::new(&config.preferred_names, &config.excluded_names)
    }

    fn is_preferred(&self, voice: &Voice) -> bool {
        name_matches(&voice.display_name, &self.preferred)
    }

    fn is_excluded(&self, voice: &Voice) -> bool {
        name_matches(&voice.display_name, &self.excluded)
    }
}

impl Default for NameHeuristic {
    fn default() -> Self {
        Self::new(
            defaults::FEMININE_VOICE_NAMES,
            defaults::MASCULINE_VOICE_NAMES,
        )
    }
}

impl VoicePreference for NameHeuristic {
    fn select(&self, catalog: &[Voice], language_tag: &str) -> Option<Voice> {
        catalog
            .iter()
            .find(|voice| voice.speaks(language_tag) && self.is_preferred(voice))
            .or_else(|| catalog.iter().find(|voice| self.is_preferred(voice)))
            .or_else(|| catalog.iter().find(|voice| !self.is_excluded(voice)))
            .cloned()
    }
}

/// Select with the built-in name lists.
pub fn select(catalog: &[Voice], language_tag: &str) -> Option<Voice> {
    NameHeuristic::default().select(catalog, language_tag)
}

fn normalize<I>(names: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

fn name_matches(display_name: &str, names: &[String]) -> bool {
    let display_name = display_name.to_lowercase();
    names.iter().any(|name| display_name.contains(name.as_str()))
}
