//! Cache store construction and connection management.
//!
//! Directories are created when the store is built. The database file and its
//! schema are only created when the first data operation needs a connection.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;
use rusqlite::Connection;

use super::schema;
use crate::Error;
use crate::config::CacheConfig;

/// Persistent key-value cache backed by a single SQLite file.
///
/// Holds at most one connection, opened on first use and kept until the
/// store is closed or dropped. The store is `Send` but not `Sync`; wrap it in
/// a mutex to share it between threads.
#[derive(Debug)]
pub struct CacheStore {
    name: String,
    directory: PathBuf,
    path: PathBuf,
    pub(crate) conn: OnceCell<Connection>,
}

impl CacheStore {
    /// Open the default cache, `~/.local/litecache/litecache/litecache.db`.
    pub fn new() -> Result<Self, Error> {
        Self::with_config(&CacheConfig::default())
    }

    /// Open a cache named `name` under `directory`.
    ///
    /// `None`, empty or whitespace-only arguments fall back to the defaults.
    pub fn open(directory: Option<&Path>, name: Option<&str>) -> Result<Self, Error> {
        Self::with_config(&CacheConfig::from_parts(directory, name))
    }

    /// Open a cache from a configuration.
    ///
    /// Creates the base directory and the cache subdirectory if missing.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an invalid configuration and `Error::Io`
    /// if a directory cannot be created.
    pub fn with_config(config: &CacheConfig) -> Result<Self, Error> {
        config.validate()?;

        let base = config.base_directory()?;
        ensure_dir(&base)?;

        let directory = base.join(&config.name);
        ensure_dir(&directory)?;

        let path = directory.join(format!("{}.db", config.name));

        Ok(Self { name: config.name.clone(), directory, path, conn: OnceCell::new() })
    }

    /// Logical cache name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory holding the database file.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the connection has been opened.
    pub fn is_connected(&self) -> bool {
        self.conn.get().is_some()
    }

    /// Get the connection, opening it and creating the schema on first use.
    pub(crate) fn connection(&self) -> Result<&Connection, Error> {
        self.conn.get_or_try_init(|| open_connection(&self.path))
    }

    /// Close the connection, if open.
    ///
    /// Dropping the store also closes it; this variant reports close errors.
    pub fn close(self) -> Result<(), Error> {
        match self.conn.into_inner() {
            Some(conn) => conn.close().map_err(|(_, e)| Error::Database(e)),
            None => Ok(()),
        }
    }

    /// Remove the cache directory and the database file in it.
    ///
    /// Returns `false` if the directory is already gone or cannot be removed;
    /// a removal failure (e.g. permission denied) is logged at error level.
    /// An open connection is left as is; close the store before reusing the
    /// path.
    pub fn cleanup(&self) -> bool {
        if !self.directory.is_dir() {
            return false;
        }

        match fs::remove_dir_all(&self.directory) {
            Ok(()) => {
                tracing::debug!(path = %self.directory.display(), "removed cache directory");
                true
            }
            Err(e) => {
                tracing::error!(path = %self.directory.display(), error = %e, "failed to remove cache directory");
                false
            }
        }
    }
}

fn ensure_dir(dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(dir).map_err(|e| {
        tracing::error!(path = %dir.display(), error = %e, "failed to create cache directory");
        Error::io("failed to create cache directory", dir, e)
    })
}

fn open_connection(path: &Path) -> Result<Connection, Error> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;
         PRAGMA temp_store=MEMORY;",
    )?;

    schema::ensure(&conn)?;

    tracing::debug!(path = %path.display(), "opened cache database");
    Ok(conn)
}
