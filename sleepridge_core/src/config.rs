//! Configuration file support for sleepridge.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/sleepridge/config.toml`.
//! The file is optional and every key has a default.

use crate::ridge::RenderOptions;
use crate::sampler::SamplerParams;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub sampler: SamplerParams,

    #[serde(default)]
    pub render: RenderOptions,
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            Some(config_path) => {
                tracing::debug!("No config file found at {:?}, using defaults", config_path);
                Ok(Self::default())
            }
            None => {
                tracing::debug!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("sleepridge").join("config.toml"))
    }

    /// Check every section, reporting the first bad value
    pub fn validate(&self) -> Result<()> {
        self.sampler
            .validate()
            .and_then(|()| self.render.validate())
            .map_err(|e| match e {
                Error::InvalidParameter(msg) => Error::Config(msg),
                other => other,
            })
    }
}
