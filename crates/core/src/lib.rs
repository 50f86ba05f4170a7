//! Local, persistent key-value cache backed by SQLite.
//!
//! This crate provides:
//! - `CacheStore`, a single-connection cache over one SQLite file
//! - Unified error types
//! - Configuration structures
//!
//! ```no_run
//! use litecache::CacheStore;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), litecache::Error> {
//! let store = CacheStore::open(None, Some("demo"))?;
//! store.set("alpha", &json!({"n": 1}))?;
//! assert_eq!(store.get::<serde_json::Value>("alpha")?, Some(json!({"n": 1})));
//! store.delete("alpha")?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheStore, Entry};
pub use config::CacheConfig;
pub use error::Error;
