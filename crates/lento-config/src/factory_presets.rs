//! Factory presets bundled with lento.
//!
//! Embedded at compile time, so they are always available without files on
//! disk.

use crate::Preset;

/// Internal identifiers of the factory presets.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "off",
    "slowed_reverb",
    "daycore",
    "nightcore",
    "vaporwave",
    "bass_boosted",
];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("off", OFF_PRESET),
    ("slowed_reverb", SLOWED_REVERB_PRESET),
    ("daycore", DAYCORE_PRESET),
    ("nightcore", NIGHTCORE_PRESET),
    ("vaporwave", VAPORWAVE_PRESET),
    ("bass_boosted", BASS_BOOSTED_PRESET),
];

/// Processing off, everything neutral.
const OFF_PRESET: &str = r#"
name = "Off"
description = "Unprocessed playback"
enabled = false
speed = 1.0
reverb = 0.0
bass_boost = 0.0
pitch_correction = false
"#;

const SLOWED_REVERB_PRESET: &str = r#"
name = "Slowed + Reverb"
description = "A little slower, a lot of room"
speed = 0.85
reverb = 40.0
bass_boost = 30.0

[reverb_params]
duration_seconds = 4.0
decay_rate = 1.0
"#;

/// Slower and lower, pitch left to drop with the tempo.
const DAYCORE_PRESET: &str = r#"
name = "Daycore"
description = "Slow and dark, pitch follows the tempo"
speed = 0.8
reverb = 50.0
bass_boost = 20.0
pitch_correction = false
"#;

const NIGHTCORE_PRESET: &str = r#"
name = "Nightcore"
description = "Sped up and bright, barely any room"
speed = 1.25
reverb = 10.0
bass_boost = 0.0
pitch_correction = false
"#;

/// Longest and softest hall tail.
const VAPORWAVE_PRESET: &str = r#"
name = "Vaporwave"
description = "Very slow with a long, washed-out hall"
speed = 0.75
reverb = 60.0
bass_boost = 40.0

[reverb_params]
duration_seconds = 6.0
decay_rate = 0.5
"#;

const BASS_BOOSTED_PRESET: &str = r#"
name = "Bass Boosted"
description = "Original tempo, heavy low shelf"
speed = 1.0
reverb = 0.0
bass_boost = 80.0
pitch_correction = false
"#;

/// All factory presets, in display order.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by identifier or display name (case-insensitive).
///
/// # Example
///
/// ```rust
/// use lento_config::get_factory_preset;
///
/// let preset = get_factory_preset("daycore").expect("bundled");
/// assert_eq!(preset.speed, 0.8);
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    find_factory_preset(name).map(|(_, preset)| preset)
}

/// Like [`get_factory_preset`], also returning the internal identifier.
pub(crate) fn find_factory_preset(name: &str) -> Option<(&'static str, Preset)> {
    let name_lower = name.to_lowercase();

    for (id, toml) in FACTORY_PRESETS_TOML {
        if *id == name_lower {
            return Preset::from_toml(toml).ok().map(|p| (*id, p));
        }
    }

    // Display names
    FACTORY_PRESETS_TOML.iter().find_map(|(id, toml)| {
        Preset::from_toml(toml)
            .ok()
            .filter(|p| p.name.to_lowercase() == name_lower)
            .map(|p| (*id, p))
    })
}

/// Identifiers of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Whether `name` is a factory preset identifier or display name.
pub fn is_factory_preset(name: &str) -> bool {
    find_factory_preset(name).is_some()
}
