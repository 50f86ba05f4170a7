//! Schema setup for the `entries` table.
//!
//! The schema is unversioned. Every statement uses `IF NOT EXISTS`, so
//! [`ensure`] can run on every new connection.

use rusqlite::Connection;

use crate::Error;

pub(crate) const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS entries (key TEXT PRIMARY KEY, val BLOB)";

pub(crate) const CREATE_INDEX: &str = "CREATE INDEX IF NOT EXISTS keyname_index ON entries (key)";

/// Create the table and index if missing, in one committed transaction.
pub(crate) fn ensure(conn: &Connection) -> Result<(), Error> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(CREATE_TABLE, [])?;
    tx.execute(CREATE_INDEX, [])?;
    tx.commit()?;

    tracing::debug!("ran the create table and index statements");
    Ok(())
}
