//! User settings and the control values derived from them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, read_text, write_text};
use crate::factory_presets;
use crate::mapping::{self, clamp_percent};
use crate::preset::Preset;
use crate::validation::{ValidationResult, validate_settings};
use lento_effects::{ImpulseResponseSynth, IrAlgorithm, ReverbParameters};

/// Maximum bass shelf gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BassProfile {
    /// Up to 6 dB.
    #[default]
    Standard,
    /// Up to 12 dB.
    Enhanced,
}

impl BassProfile {
    /// Shelf gain at 100% bass boost.
    pub fn max_gain_db(&self) -> f32 {
        match self {
            BassProfile::Standard => 6.0,
            BassProfile::Enhanced => 12.0,
        }
    }

    /// Parse `standard` or `enhanced`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "standard" => Some(BassProfile::Standard),
            "enhanced" => Some(BassProfile::Enhanced),
            _ => None,
        }
    }
}

/// Reverb kernel algorithm as stored in settings files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Freeverb-style hall.
    #[default]
    Hall,
    /// Decaying noise.
    Noise,
}

impl From<Algorithm> for IrAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Hall => IrAlgorithm::Hall,
            Algorithm::Noise => IrAlgorithm::Noise,
        }
    }
}

impl From<IrAlgorithm> for Algorithm {
    fn from(algorithm: IrAlgorithm) -> Self {
        match algorithm {
            IrAlgorithm::Hall => Algorithm::Hall,
            IrAlgorithm::Noise => Algorithm::Noise,
        }
    }
}

/// Reverb tail shape as stored in settings files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReverbConfig {
    /// Tail length in seconds.
    pub duration_seconds: f32,
    /// Envelope decay rate.
    pub decay_rate: f32,
}

impl Default for ReverbConfig {
    fn default() -> Self {
        ReverbParameters::default().into()
    }
}

impl From<ReverbConfig> for ReverbParameters {
    fn from(config: ReverbConfig) -> Self {
        ReverbParameters::new(config.duration_seconds, config.decay_rate)
    }
}

impl From<ReverbParameters> for ReverbConfig {
    fn from(params: ReverbParameters) -> Self {
        Self {
            duration_seconds: params.duration_seconds,
            decay_rate: params.decay_rate,
        }
    }
}

/// Every scalar the signal chain needs, derived from [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlValues {
    /// Playback rate.
    pub rate: f32,
    /// Reverb send gain.
    pub wet: f32,
    /// Direct signal gain.
    pub dry: f32,
    /// Bass shelf gain in dB.
    pub shelf_gain_db: f32,
    /// Grain processor pitch factor.
    pub pitch_factor: f32,
    /// Whole chain bypassed.
    pub bypass: bool,
}

/// User settings.
///
/// Missing keys take their defaults, so a settings file may list only the
/// fields it changes.
///
/// # TOML Format
///
/// ```toml
/// enabled = true
/// speed = 0.85
/// reverb = 40.0
/// bass_boost = 30.0
/// pitch_correction = false
/// active_preset = "slowed_reverb"
/// bass_profile = "standard"
/// algorithm = "hall"
///
/// [reverb_params]
/// duration_seconds = 4.0
/// decay_rate = 1.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Processing switched on.
    pub enabled: bool,
    /// Playback speed ratio, 0.5 to 1.5.
    pub speed: f32,
    /// Reverb amount in percent.
    pub reverb: f32,
    /// Bass boost in percent.
    pub bass_boost: f32,
    /// Undo the pitch change caused by `speed`.
    pub pitch_correction: bool,
    /// Factory preset the values came from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_preset: Option<String>,
    /// Bass shelf range.
    pub bass_profile: BassProfile,
    /// Reverb kernel algorithm.
    pub algorithm: Algorithm,
    /// Reverb kernel shape.
    pub reverb_params: ReverbConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: false,
            speed: 0.85,
            reverb: 30.0,
            bass_boost: 0.0,
            pitch_correction: false,
            active_preset: None,
            bass_profile: BassProfile::Standard,
            algorithm: Algorithm::Hall,
            reverb_params: ReverbConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml(&read_text(path.as_ref())?)
    }

    /// Load settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save settings to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        write_text(path.as_ref(), &self.to_toml()?)
    }

    /// Convert to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field against its range.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_settings(self)
    }

    /// Copy with every field clamped into range.
    ///
    /// Non-finite reverb parameters fall back to the algorithm's defaults.
    pub fn sanitized(&self) -> Self {
        let algorithm = IrAlgorithm::from(self.algorithm);
        let params = ReverbParameters::from(self.reverb_params);
        let params = if params.duration_seconds.is_finite() && params.decay_rate.is_finite() {
            params
        } else {
            ReverbParameters::default_for(algorithm)
        };

        Self {
            speed: mapping::playback_rate(self.speed),
            reverb: clamp_percent(self.reverb),
            bass_boost: clamp_percent(self.bass_boost),
            reverb_params: params.clamped(algorithm).into(),
            ..self.clone()
        }
    }

    /// Derive the chain's control values.
    pub fn control_values(&self) -> ControlValues {
        let mix = mapping::wet_dry_mix(self.reverb);
        ControlValues {
            rate: mapping::playback_rate(self.speed),
            wet: mix.wet,
            dry: mix.dry,
            shelf_gain_db: mapping::bass_boost_gain_db(
                self.bass_boost,
                self.bass_profile.max_gain_db(),
            ),
            pitch_factor: mapping::pitch_correction_factor(self.speed, self.pitch_correction),
            bypass: !self.enabled,
        }
    }

    /// Impulse response request for the current reverb settings, clamped.
    pub fn to_synth(&self) -> ImpulseResponseSynth {
        let sanitized = self.sanitized();
        let algorithm = IrAlgorithm::from(sanitized.algorithm);
        ImpulseResponseSynth::new(algorithm, sanitized.reverb_params.into())
    }

    /// Apply a preset's values.
    ///
    /// Returns `true` when the change is discontinuous for the grain
    /// processor (rate, pitch factor or bypass changed), in which case the
    /// caller should clear it.
    pub fn apply(&mut self, preset: &Preset) -> bool {
        let before = self.control_values();
        preset.apply_to(self);
        let after = self.control_values();

        before.rate != after.rate
            || before.pitch_factor != after.pitch_factor
            || before.bypass != after.bypass
    }

    /// Apply a factory preset by name (case-insensitive) and record it as
    /// the active preset.
    ///
    /// Returns whether the change is discontinuous, as [`Settings::apply`].
    pub fn apply_preset(&mut self, name: &str) -> Result<bool, ConfigError> {
        let (id, preset) = factory_presets::find_factory_preset(name)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?;
        let discontinuous = self.apply(&preset);
        self.active_preset = Some(id.to_string());
        Ok(discontinuous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert!(!settings.enabled);
        assert_eq!(settings.speed, 0.85);
        assert_eq!(settings.bass_profile, BassProfile::Standard);
        assert_eq!(settings.algorithm, Algorithm::Hall);
        assert_eq!(settings.reverb_params.duration_seconds, 4.0);
        assert!(settings.active_preset.is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let settings = Settings::from_toml("speed = 0.7\nbass_profile = \"enhanced\"").unwrap();
        assert_eq!(settings.speed, 0.7);
        assert_eq!(settings.bass_profile, BassProfile::Enhanced);
        assert_eq!(settings.reverb, Settings::default().reverb);
    }

    #[test]
    fn toml_roundtrip() {
        let settings = Settings {
            enabled: true,
            active_preset: Some("daycore".to_string()),
            algorithm: Algorithm::Noise,
            reverb_params: ReverbConfig {
                duration_seconds: 2.5,
                decay_rate: 1.0,
            },
            ..Settings::default()
        };
        let text = settings.to_toml().unwrap();
        assert!(text.contains("algorithm = \"noise\""), "got: {text}");
        assert_eq!(Settings::from_toml(&text).unwrap(), settings);
    }

    #[test]
    fn unknown_profile_is_a_parse_error() {
        let err = Settings::from_toml("bass_profile = \"huge\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn profile_gain() {
        assert_eq!(BassProfile::Standard.max_gain_db(), 6.0);
        assert_eq!(BassProfile::Enhanced.max_gain_db(), 12.0);
        assert_eq!(BassProfile::from_name("enhanced"), Some(BassProfile::Enhanced));
        assert_eq!(BassProfile::from_name("loud"), None);
    }

    #[test]
    fn sanitized_clamps_everything() {
        let settings = Settings {
            speed: 9.0,
            reverb: -20.0,
            bass_boost: 300.0,
            reverb_params: ReverbConfig {
                duration_seconds: 60.0,
                decay_rate: 0.0,
            },
            ..Settings::default()
        };
        let clean = settings.sanitized();
        assert_eq!(clean.speed, 1.5);
        assert_eq!(clean.reverb, 0.0);
        assert_eq!(clean.bass_boost, 100.0);
        assert_eq!(clean.reverb_params.duration_seconds, 6.0);
        assert_eq!(clean.reverb_params.decay_rate, 0.3);
        assert!(clean.validate().is_ok());
    }

    #[test]
    fn sanitized_replaces_non_finite_reverb() {
        let mut settings = Settings::default();
        settings.algorithm = Algorithm::Noise;
        settings.reverb_params.duration_seconds = f32::NAN;
        let clean = settings.sanitized();
        assert_eq!(clean.reverb_params.duration_seconds, 2.0);
    }

    #[test]
    fn control_values_follow_mappings() {
        let settings = Settings {
            enabled: true,
            speed: 0.8,
            reverb: 100.0,
            bass_boost: 50.0,
            pitch_correction: true,
            bass_profile: BassProfile::Enhanced,
            ..Settings::default()
        };
        let values = settings.control_values();
        assert_eq!(values.rate, 0.8);
        assert!((values.wet - 1.4).abs() < 1e-6);
        assert!((values.dry - 0.75).abs() < 1e-6);
        assert_eq!(values.shelf_gain_db, 6.0);
        assert!((values.pitch_factor - 1.25).abs() < 1e-6);
        assert!(!values.bypass);
    }

    #[test]
    fn disabled_settings_bypass() {
        assert!(Settings::default().control_values().bypass);
    }

    #[test]
    fn synth_uses_clamped_parameters() {
        let mut settings = Settings::default();
        settings.reverb_params.duration_seconds = 1.0;
        let synth = settings.to_synth();
        assert_eq!(synth.algorithm(), IrAlgorithm::Hall);
        assert_eq!(synth.params().duration_seconds, 3.0);
        assert_eq!(synth.output_len(8000), 24000);
    }

    #[test]
    fn apply_preset_records_name() {
        let mut settings = Settings::default();
        let discontinuous = settings.apply_preset("Nightcore").unwrap();
        assert!(discontinuous);
        assert_eq!(settings.active_preset.as_deref(), Some("nightcore"));
        assert_eq!(settings.speed, 1.25);
        assert!(settings.enabled);
    }

    #[test]
    fn reapplying_a_preset_is_continuous() {
        let mut settings = Settings::default();
        settings.apply_preset("slowed_reverb").unwrap();
        assert!(!settings.apply_preset("slowed_reverb").unwrap());
    }

    #[test]
    fn unknown_preset() {
        let mut settings = Settings::default();
        let err = settings.apply_preset("chipmunk").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPreset(ref n) if n == "chipmunk"));
        assert_eq!(settings, Settings::default());
    }
}
