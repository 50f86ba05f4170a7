//! Cache configuration with layered loading.
//!
//! Configuration is assembled with figment from:
//!
//! 1. A TOML file (if one is passed to [`CacheConfig::load`])
//! 2. Built-in defaults
//!
//! There is no environment-variable layer; the location of a cache is decided
//! by the embedding application.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::Error;

mod validation;

pub use validation::ConfigError;

/// Name used for the cache subdirectory and database file when none is given.
pub const DEFAULT_CACHE_NAME: &str = "litecache";

/// Location of a cache on disk.
///
/// The database lives at `<directory>/<name>/<name>.db`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Base directory holding one subdirectory per named cache.
    ///
    /// Defaults to `~/.local/litecache` when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Logical cache name.
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_name() -> String {
    DEFAULT_CACHE_NAME.into()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { directory: None, name: default_name() }
    }
}

impl CacheConfig {
    /// Build a configuration from optional parts.
    ///
    /// Missing, empty or whitespace-only values fall back to the defaults.
    pub fn from_parts(directory: Option<&Path>, name: Option<&str>) -> Self {
        let directory = directory.filter(|d| !d.as_os_str().is_empty()).map(Path::to_path_buf);
        let name = name.filter(|n| !n.trim().is_empty()).map_or_else(default_name, str::to_string);
        Self { directory, name }
    }

    /// Load configuration from defaults and an optional TOML file.
    ///
    /// Keys present in the file override the defaults; absent keys keep them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be parsed or validation fails.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Resolve the base directory, falling back to `~/.local/litecache`.
    ///
    /// # Errors
    ///
    /// Returns `Error::HomeDirUnavailable` if no directory is configured and
    /// the home directory cannot be determined.
    pub fn base_directory(&self) -> Result<PathBuf, Error> {
        match &self.directory {
            Some(dir) => Ok(dir.clone()),
            None => default_base_directory(),
        }
    }
}

/// `~/.local/litecache`.
pub fn default_base_directory() -> Result<PathBuf, Error> {
    let home = dirs::home_dir().ok_or(Error::HomeDirUnavailable)?;
    Ok(home.join(".local").join(DEFAULT_CACHE_NAME))
}
