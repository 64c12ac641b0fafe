//! Preset file format.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, read_text, write_text};
use crate::settings::{Algorithm, ReverbConfig, Settings};

/// A named set of control values.
///
/// Optional fields leave the corresponding setting untouched when the
/// preset is applied.
///
/// # TOML Format
///
/// ```toml
/// name = "Slowed + Reverb"
/// description = "The classic: a little slower, a lot of room"
/// enabled = true
/// speed = 0.85
/// reverb = 40.0
/// bass_boost = 30.0
///
/// [reverb_params]
/// duration_seconds = 4.0
/// decay_rate = 1.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Display name.
    pub name: String,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the preset switches processing on.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Playback speed ratio.
    pub speed: f32,

    /// Reverb amount in percent.
    #[serde(default)]
    pub reverb: f32,

    /// Bass boost in percent.
    #[serde(default)]
    pub bass_boost: f32,

    /// Pitch correction override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_correction: Option<bool>,

    /// Reverb algorithm override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<Algorithm>,

    /// Reverb shape override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverb_params: Option<ReverbConfig>,
}

fn default_enabled() -> bool {
    true
}

impl Preset {
    /// Create a preset at unity speed with no reverb or bass.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            enabled: true,
            speed: 1.0,
            reverb: 0.0,
            bass_boost: 0.0,
            pitch_correction: None,
            algorithm: None,
            reverb_params: None,
        }
    }

    /// Capture the control values of `settings`.
    pub fn from_settings(name: impl Into<String>, settings: &Settings) -> Self {
        Self {
            name: name.into(),
            description: None,
            enabled: settings.enabled,
            speed: settings.speed,
            reverb: settings.reverb,
            bass_boost: settings.bass_boost,
            pitch_correction: Some(settings.pitch_correction),
            algorithm: Some(settings.algorithm),
            reverb_params: Some(settings.reverb_params),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml(&read_text(path.as_ref())?)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        write_text(path.as_ref(), &self.to_toml()?)
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the preset's values into `settings`.
    ///
    /// `active_preset` is set to the preset's display name; see
    /// [`Settings::apply_preset`] for factory presets.
    pub fn apply_to(&self, settings: &mut Settings) {
        settings.enabled = self.enabled;
        settings.speed = self.speed;
        settings.reverb = self.reverb;
        settings.bass_boost = self.bass_boost;
        if let Some(pitch_correction) = self.pitch_correction {
            settings.pitch_correction = pitch_correction;
        }
        if let Some(algorithm) = self.algorithm {
            settings.algorithm = algorithm;
        }
        if let Some(params) = self.reverb_params {
            settings.reverb_params = params;
        }
        settings.active_preset = Some(self.name.clone());
    }
}
