//! Unified error types for litecache.
//!
//! Every message starts with a stable upper-case code so callers can match on
//! the rendered text as well as on the variant.

use std::path::PathBuf;

use rusqlite::ErrorCode;

use crate::config::ConfigError;

/// Unified error type for cache operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Precondition violation (e.g., blank key, null value).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Directory creation or removal failed.
    #[error("CACHE_IO: {message} ({})", path.display())]
    Io {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(rusqlite::Error),

    /// Value could not be serialized to JSON.
    #[error("ENCODE_FAILED: {0}")]
    Encode(#[source] serde_json::Error),

    /// Stored value is not valid JSON for the requested type.
    #[error("DECODE_FAILED: key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Stored value is not UTF-8 text.
    #[error("DECODE_FAILED: key '{key}': stored value is not UTF-8 text")]
    NotUtf8 { key: String },

    /// Configuration could not be loaded or is invalid.
    #[error("CONFIG_ERROR: {0}")]
    Config(ConfigError),

    /// No home directory to derive the default cache location from.
    #[error("CONFIG_ERROR: could not determine home directory")]
    HomeDirUnavailable,
}

impl Error {
    /// Whether this is a SQLite constraint (integrity) violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Error::Database(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation
        )
    }

    pub(crate) fn io(message: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { message: message.into(), path: path.into(), source }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}
