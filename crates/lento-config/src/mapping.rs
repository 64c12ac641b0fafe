//! Control-parameter mapping.
//!
//! Pure scalar transforms from user-facing controls (speed ratio,
//! percentages) to the values the signal chain consumes. Every function is
//! total: out-of-range inputs are clamped, never rejected.

/// Slowest playback speed.
pub const MIN_SPEED: f32 = 0.5;

/// Fastest playback speed.
pub const MAX_SPEED: f32 = 1.5;

/// Wet gain at 100% reverb. Above unity on purpose.
pub const MAX_WET_GAIN: f32 = 1.4;

/// Playback rate for a speed control. The rate is the speed itself, bounded.
/// NaN plays at unity.
pub fn playback_rate(speed: f32) -> f32 {
    if speed.is_nan() {
        1.0
    } else {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    }
}

/// Gains for the reverb mix bus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WetDry {
    /// Gain applied to the convolved signal.
    pub wet: f32,
    /// Gain applied to the direct signal.
    pub dry: f32,
}

/// Wet/dry gains for a reverb percentage.
///
/// Wet rises linearly to 1.4 while dry only falls to 0.75, so the direct
/// signal stays audible at full reverb.
///
/// ```rust
/// use lento_config::mapping::wet_dry_mix;
///
/// let mix = wet_dry_mix(100.0);
/// assert!((mix.wet - 1.4).abs() < 1e-6);
/// assert!((mix.dry - 0.75).abs() < 1e-6);
/// ```
pub fn wet_dry_mix(reverb_percent: f32) -> WetDry {
    let p = clamp_percent(reverb_percent);
    WetDry {
        wet: p / 100.0 * MAX_WET_GAIN,
        dry: 1.0 - p / 400.0,
    }
}

/// Shelf gain in dB for a bass boost percentage under `max_gain_db`.
pub fn bass_boost_gain_db(percent: f32, max_gain_db: f32) -> f32 {
    clamp_percent(percent) * (max_gain_db / 100.0)
}

/// Pitch factor that undoes the pitch change of a speed change.
///
/// `1 / playback_rate(speed)` when enabled, unity otherwise.
pub fn pitch_correction_factor(speed: f32, enabled: bool) -> f32 {
    if enabled {
        1.0 / playback_rate(speed)
    } else {
        1.0
    }
}

/// Speed label with two decimals and an `x` suffix, e.g. `0.85x`.
pub fn format_speed_display(speed: f32) -> String {
    format!("{:.2}x", playback_rate(speed))
}

// NaN maps to 0 rather than propagating into gains.
pub(crate) fn clamp_percent(percent: f32) -> f32 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}
