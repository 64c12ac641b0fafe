//! CLI command implementations.

pub mod analyze;
pub mod common;
pub mod impulse;
pub mod params;
pub mod presets;
pub mod render;
pub mod shift;
