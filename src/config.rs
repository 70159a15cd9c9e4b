use crate::defaults;
use crate::error::{Result, VoiceError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub recognition: RecognitionConfig,
    pub narration: NarrationConfig,
    pub voices: VoicesConfig,
}

/// Speech capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecognitionConfig {
    pub language: String,
}

/// Result narration configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NarrationConfig {
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub currency: String,
    pub auto_announce: bool,
}

/// Voice selection heuristic name lists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoicesConfig {
    pub preferred_names: Vec<String>,
    pub excluded_names: Vec<String>,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: defaults::LANGUAGE.to_string(),
        }
    }
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            language: defaults::LANGUAGE.to_string(),
            rate: defaults::SPEECH_RATE,
            pitch: defaults::SPEECH_PITCH,
            volume: defaults::SPEECH_VOLUME,
            currency: defaults::CURRENCY.to_string(),
            auto_announce: defaults::AUTO_ANNOUNCE,
        }
    }
}

impl Default for VoicesConfig {
    fn default() -> Self {
        Self {
            preferred_names: to_owned_list(defaults::FEMININE_VOICE_NAMES),
            excluded_names: to_owned_list(defaults::MASCULINE_VOICE_NAMES),
        }
    }
}

fn to_owned_list(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values. The loaded values are validated.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't exist
    ///
    /// Only a missing file falls back to defaults; invalid TOML and invalid
    /// values are returned as errors.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(VoiceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - QUERYVOICE_LANGUAGE → recognition.language and narration.language
    /// - QUERYVOICE_CURRENCY → narration.currency
    /// - QUERYVOICE_AUTO_ANNOUNCE → narration.auto_announce (true/false/1/0)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(language) = std::env::var("QUERYVOICE_LANGUAGE")
            && !language.is_empty()
        {
            self.recognition.language = language.clone();
            self.narration.language = language;
        }

        if let Ok(currency) = std::env::var("QUERYVOICE_CURRENCY")
            && !currency.is_empty()
        {
            self.narration.currency = currency;
        }

        if let Ok(value) = std::env::var("QUERYVOICE_AUTO_ANNOUNCE")
            && let Some(enabled) = parse_bool(&value)
        {
            self.narration.auto_announce = enabled;
        }

        self
    }

    /// Check value ranges the speech platform accepts.
    pub fn validate(&self) -> Result<()> {
        if self.recognition.language.trim().is_empty() {
            return Err(invalid("recognition.language", "must not be empty"));
        }
        if self.narration.language.trim().is_empty() {
            return Err(invalid("narration.language", "must not be empty"));
        }
        check_range("narration.rate", self.narration.rate, defaults::RATE_RANGE)?;
        check_range("narration.pitch", self.narration.pitch, defaults::PITCH_RANGE)?;
        check_range(
            "narration.volume",
            self.narration.volume,
            defaults::VOLUME_RANGE,
        )?;
        Ok(())
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/queryvoice/config.toml on Linux
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("queryvoice").join("config.toml"))
            .ok_or_else(|| VoiceError::Other("Could not determine config directory".to_string()))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(key: &str, message: &str) -> VoiceError {
    VoiceError::ConfigInvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn check_range(key: &str, value: f32, (min, max): (f32, f32)) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(invalid(key, &format!("must be between {min} and {max}")))
    }
}
