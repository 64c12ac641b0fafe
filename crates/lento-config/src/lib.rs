//! Settings, control mapping and presets for lento.
//!
//! The DSP crates take plain numbers. This crate owns the user-facing side:
//! the [`Settings`] schema (TOML on disk), the scalar [`mapping`] from
//! controls to chain values, validation, and the bundled factory presets.
//!
//! # Example
//!
//! ```rust
//! use lento_config::Settings;
//!
//! let mut settings = Settings::default();
//! let discontinuous = settings.apply_preset("slowed_reverb").unwrap();
//! assert!(discontinuous);
//!
//! let values = settings.control_values();
//! assert_eq!(values.rate, 0.85);
//! assert!(!values.bypass);
//! ```

mod error;
mod preset;
mod settings;

/// Control-to-chain scalar mapping.
pub mod mapping;

/// Settings validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::{ConfigError, FileOp};
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use mapping::{
    WetDry, bass_boost_gain_db, format_speed_display, pitch_correction_factor, playback_rate,
    wet_dry_mix,
};
pub use preset::Preset;
pub use settings::{Algorithm, BassProfile, ControlValues, ReverbConfig, Settings};
pub use validation::{ValidationError, ValidationResult, validate_settings};
