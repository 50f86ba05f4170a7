//! SQLite-backed key-value cache.
//!
//! One database file per named cache, holding a single `entries` table of
//! string keys and JSON-encoded values. It supports:
//!
//! - Lazy connection setup with idempotent schema creation
//! - Native upsert (`set`) and `REPLACE` (`update`) writes
//! - Raw (`dump`) and decoded (`entries`) listings
//! - Removal of the whole cache directory (`cleanup`)

pub mod connection;
pub mod entries;
mod schema;

pub use crate::Error;

pub use connection::CacheStore;
pub use entries::Entry;

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;
    use tracing_subscriber::EnvFilter;

    use super::CacheStore;

    pub(crate) fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// A store named `name` inside a fresh temporary base directory.
    pub(crate) fn temp_store(name: &str) -> (TempDir, CacheStore) {
        init_tracing();
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::open(Some(tmp.path()), Some(name)).unwrap();
        (tmp, store)
    }
}
