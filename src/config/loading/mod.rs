use std::{fs, path::Path};

use tracing::debug;

use super::{Config, ConfigPaths};
use crate::{Result, WavecontrolError};

impl Config {
    /// Loads the main configuration file, or defaults when it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration directory cannot be determined,
    /// or if an existing file cannot be read, parsed or validated.
    pub fn load() -> Result<Config> {
        let path = ConfigPaths::main_config()?;
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        Self::load_from_path(&path)
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file cannot be read
    /// - The TOML content is invalid
    /// - A value fails validation
    pub fn load_from_path(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| WavecontrolError::io_at(e, path))?;
        let config: Config =
            toml::from_str(&content).map_err(|e| WavecontrolError::toml_parse(e, Some(path)))?;

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a value fails validation.
    pub fn from_toml_str(content: &str) -> Result<Config> {
        let config: Config =
            toml::from_str(content).map_err(|e| WavecontrolError::toml_parse(e, None))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<()> {
        self.player.validate()
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
