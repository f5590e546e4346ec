//! Configuration schema definitions and validation.
//!
//! Defines the configuration structure for wavecontrol: general settings
//! and player settings. All configurations are serializable to/from TOML.

mod general;
mod loading;
mod paths;
mod player;

#[cfg(test)]
mod tests;

pub use general::{GeneralConfig, LogLevel};
pub use paths::ConfigPaths;
pub use player::PlayerConfig;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Main configuration structure for wavecontrol.
///
/// Represents the complete configuration schema that can be loaded
/// from TOML files. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Waveform player settings.
    #[serde(default)]
    pub player: PlayerConfig,
}
