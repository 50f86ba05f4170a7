//! Configuration validation rules.
//!
//! Applied to a `CacheConfig` after it has been loaded or assembled, before
//! any directory is created from it.

use crate::config::CacheConfig;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl CacheConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `name` is blank, `.` or `..`, or contains a path separator
    /// - `directory` is set to an empty path
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "name".into(), reason: "must not be blank".into() });
        }
        if self.name == "." || self.name == ".." {
            return Err(ConfigError::Invalid { field: "name".into(), reason: "must not be a relative path".into() });
        }
        if self.name.contains(['/', '\\']) {
            return Err(ConfigError::Invalid {
                field: "name".into(),
                reason: "must not contain path separators".into(),
            });
        }

        if self.directory.as_ref().is_some_and(|dir| dir.as_os_str().is_empty()) {
            return Err(ConfigError::Invalid { field: "directory".into(), reason: "must not be empty".into() });
        }

        Ok(())
    }
}
