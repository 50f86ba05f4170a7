//! Entry operations.
//!
//! Values are stored as UTF-8 JSON text in the `val` column. Writes accept
//! any `Serialize` type and reads decode into any `DeserializeOwned` type;
//! `serde_json::Value` covers callers without a concrete type.

use rusqlite::types::{FromSql, FromSqlResult, ValueRef};
use rusqlite::{OptionalExtension, params};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::connection::CacheStore;
use crate::Error;

const GET_SQL: &str = "SELECT val FROM entries WHERE key = ?1";
const EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM entries WHERE key = ?1)";
const COUNT_SQL: &str = "SELECT COUNT(*) FROM entries";
const DUMP_SQL: &str = "SELECT key, val FROM entries";
const UPSERT_SQL: &str = "INSERT INTO entries (key, val) VALUES (?1, ?2)
     ON CONFLICT(key) DO UPDATE SET val = excluded.val";
const REPLACE_SQL: &str = "REPLACE INTO entries (key, val) VALUES (?1, ?2)";
const DELETE_SQL: &str = "DELETE FROM entries WHERE key = ?1";
const CLEAR_SQL: &str = "DELETE FROM entries";

/// A raw cache row: the key and its JSON-encoded value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub val: String,
}

impl Entry {
    /// Decode the stored JSON into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_str(&self.val).map_err(|source| Error::Decode { key: self.key.clone(), source })
    }
}

/// `val` column contents, accepted as either TEXT or BLOB.
struct StoredJson(Vec<u8>);

impl FromSql for StoredJson {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_bytes().map(|bytes| StoredJson(bytes.to_vec()))
    }
}

fn check_key(key: &str) -> Result<(), Error> {
    if key.is_empty() {
        return Err(Error::InvalidInput("key cannot be blank".into()));
    }
    Ok(())
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Serialize `value` to JSON text, rejecting null and empty values.
///
/// serde_json encodes NaN and infinite floats as `null`, so they are rejected
/// here too.
fn encode_value<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    let json = serde_json::to_value(value).map_err(Error::Encode)?;
    if json.is_null() {
        return Err(Error::InvalidInput(
            "value cannot be null (None, unit, or a non-finite number such as NaN)".into(),
        ));
    }
    if is_empty_value(&json) {
        return Err(Error::InvalidInput("value cannot be empty".into()));
    }
    serde_json::to_string(&json).map_err(Error::Encode)
}

impl CacheStore {
    /// Get the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for a blank key and `Error::Decode` if
    /// the stored value does not decode into `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        check_key(key)?;
        let conn = self.connection()?;

        let stored: Option<StoredJson> = conn
            .prepare_cached(GET_SQL)?
            .query_row(params![key], |row| row.get(0))
            .optional()?;

        stored
            .map(|StoredJson(bytes)| {
                serde_json::from_slice(&bytes).map_err(|source| Error::Decode { key: key.to_string(), source })
            })
            .transpose()
    }

    /// Store `value` under `key`, overwriting any existing value.
    ///
    /// An existing row is updated in place.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for a blank key, a null/empty value or a
    /// non-finite float, and `Error::Encode` if `value` cannot be serialized.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), Error> {
        check_key(key)?;
        let data = encode_value(value)?;

        self.connection()?.prepare_cached(UPSERT_SQL)?.execute(params![key, data])?;
        Ok(())
    }

    /// Store `value` under `key` with `REPLACE` semantics.
    ///
    /// An existing row is deleted and re-inserted. Preconditions are the same
    /// as for [`CacheStore::set`].
    pub fn update<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), Error> {
        check_key(key)?;
        let data = encode_value(value)?;

        self.connection()?.prepare_cached(REPLACE_SQL)?.execute(params![key, data])?;
        Ok(())
    }

    /// Delete the entry for `key`.
    ///
    /// Returns whether a row was removed; deleting an absent key is not an
    /// error.
    pub fn delete(&self, key: &str) -> Result<bool, Error> {
        check_key(key)?;
        let removed = self.connection()?.prepare_cached(DELETE_SQL)?.execute(params![key])?;
        Ok(removed > 0)
    }

    /// Whether an entry exists for `key`.
    pub fn contains(&self, key: &str) -> Result<bool, Error> {
        check_key(key)?;
        let exists = self.connection()?.query_row(EXISTS_SQL, params![key], |row| row.get(0))?;
        Ok(exists)
    }

    /// Number of entries.
    pub fn len(&self) -> Result<u64, Error> {
        let count: i64 = self.connection()?.query_row(COUNT_SQL, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Returns `true` if the cache has no entries.
    pub fn is_empty(&self) -> Result<bool, Error> {
        self.len().map(|n| n == 0)
    }

    /// All entries in storage order, values left JSON-encoded.
    pub fn dump(&self) -> Result<Vec<Entry>, Error> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(DUMP_SQL)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, StoredJson>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(key, StoredJson(bytes))| match String::from_utf8(bytes) {
                Ok(val) => Ok(Entry { key, val }),
                Err(_) => Err(Error::NotUtf8 { key }),
            })
            .collect()
    }

    /// All entries in storage order, values decoded.
    pub fn entries(&self) -> Result<Vec<(String, Value)>, Error> {
        self.dump()?
            .into_iter()
            .map(|entry| {
                let value = entry.decode()?;
                Ok((entry.key, value))
            })
            .collect()
    }

    /// Delete all entries, keeping the schema.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&self) -> Result<usize, Error> {
        let removed = self.connection()?.execute(CLEAR_SQL, [])?;
        Ok(removed)
    }

    /// Delete all entries like [`CacheStore::clear`], logging the outcome.
    ///
    /// Failures, integrity violations in particular, are logged before being
    /// returned.
    pub fn flush(&self) -> Result<usize, Error> {
        let result = self
            .connection()
            .and_then(|conn| conn.execute(CLEAR_SQL, []).map_err(Error::from));

        match result {
            Ok(removed) => {
                tracing::debug!(removed, "cache flushed");
                Ok(removed)
            }
            Err(e) => {
                if e.is_constraint_violation() {
                    tracing::error!(error = %e, "integrity violation while flushing cache");
                } else {
                    tracing::error!(error = %e, "failed to flush cache");
                }
                Err(e)
            }
        }
    }
}
