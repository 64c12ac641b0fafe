//! Settings validation.
//!
//! [`validate_settings`] reports every field outside its documented range
//! without touching the settings; [`Settings::sanitized`] is the repairing
//! counterpart.
//!
//! # Example
//!
//! ```rust
//! use lento_config::{Settings, validate_settings};
//!
//! let mut settings = Settings::default();
//! assert!(validate_settings(&settings).is_ok());
//!
//! settings.speed = 4.0;
//! assert!(validate_settings(&settings).is_err());
//! ```
//!
//! [`Settings::sanitized`]: crate::Settings::sanitized

use crate::mapping::{MAX_SPEED, MIN_SPEED};
use crate::settings::Settings;
use lento_effects::impulse::HALL_DECAY_RANGE;
use lento_effects::IrAlgorithm;
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Value outside its range.
    #[error("'{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the settings field.
        field: String,
        /// The offending value.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// NaN or infinite value.
    #[error("'{field}' is not a finite number")]
    NotFinite {
        /// Name of the settings field.
        field: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Reject NaN and infinities.
pub fn validate_finite(field: &str, value: f32) -> ValidationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite {
            field: field.to_string(),
        })
    }
}

/// Check one field against `[min, max]`.
pub fn validate_range(field: &str, value: f32, min: f32, max: f32) -> ValidationResult<()> {
    validate_finite(field, value)?;
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Check every numeric field of `settings`.
///
/// A single failure is returned as is; several are wrapped in
/// [`ValidationError::Multiple`].
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    let algorithm = IrAlgorithm::from(settings.algorithm);
    let (min_duration, max_duration) = algorithm.duration_range();

    let checks = [
        validate_range("speed", settings.speed, MIN_SPEED, MAX_SPEED),
        validate_range("reverb", settings.reverb, 0.0, 100.0),
        validate_range("bass_boost", settings.bass_boost, 0.0, 100.0),
        validate_range(
            "reverb_params.duration_seconds",
            settings.reverb_params.duration_seconds,
            min_duration,
            max_duration,
        ),
        match algorithm {
            IrAlgorithm::Hall => validate_range(
                "reverb_params.decay_rate",
                settings.reverb_params.decay_rate,
                HALL_DECAY_RANGE.0,
                HALL_DECAY_RANGE.1,
            ),
            // The noise kernel ignores decay
            IrAlgorithm::Noise => validate_finite(
                "reverb_params.decay_rate",
                settings.reverb_params.decay_rate,
            ),
        },
    ];

    let mut errors: Vec<ValidationError> = checks.into_iter().filter_map(Result::err).collect();
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Algorithm;

    #[test]
    fn range_check() {
        assert!(validate_range("x", 0.5, 0.0, 1.0).is_ok());
        assert!(validate_range("x", 0.0, 0.0, 1.0).is_ok());
        assert!(matches!(
            validate_range("x", 1.5, 0.0, 1.0),
            Err(ValidationError::OutOfRange { value, .. }) if value == 1.5
        ));
        assert!(matches!(
            validate_range("x", f32::INFINITY, 0.0, 1.0),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_settings(&Settings::default()), Ok(()));
    }

    #[test]
    fn single_error_is_not_wrapped() {
        let settings = Settings {
            reverb: 120.0,
            ..Settings::default()
        };
        let err = validate_settings(&settings).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "reverb"));
    }

    #[test]
    fn collects_every_error() {
        let settings = Settings {
            speed: f32::NAN,
            bass_boost: -1.0,
            ..Settings::default()
        };
        match validate_settings(&settings) {
            Err(ValidationError::Multiple(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(matches!(errors[0], ValidationError::NotFinite { .. }));
            }
            other => panic!("expected Multiple, got {other:?}"),
        }
    }

    #[test]
    fn duration_range_follows_algorithm() {
        // 2.5 s is a valid noise tail but too short for the hall
        let mut settings = Settings::default();
        settings.reverb_params.duration_seconds = 2.5;
        assert!(validate_settings(&settings).is_err());

        settings.algorithm = Algorithm::Noise;
        assert!(validate_settings(&settings).is_ok());

        // Decay is only bounded for the hall
        settings.reverb_params.decay_rate = 5.0;
        assert!(validate_settings(&settings).is_ok());
        settings.reverb_params.decay_rate = f32::NAN;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn multiple_display_joins_messages() {
        let err = ValidationError::Multiple(vec![
            ValidationError::NotFinite {
                field: "speed".to_string(),
            },
            ValidationError::NotFinite {
                field: "reverb".to_string(),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("'speed'") && msg.contains("; "), "got: {msg}");
    }
}
