//! Connection setup and savepoint scoping

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::config::JournalMode;
use crate::errors::{from_rusqlite, Result};

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Apply per-connection settings
///
/// Foreign keys are off by default in SQLite and every integrity rule of
/// the schema depends on them, so this must run on every new connection.
pub fn configure(
    conn: &Connection,
    journal_mode: JournalMode,
    busy_timeout: Duration,
) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(from_rusqlite)?;
    conn.busy_timeout(busy_timeout).map_err(from_rusqlite)?;

    // journal_mode answers with the mode actually in effect
    let _mode: String = conn
        .pragma_update_and_check(None, "journal_mode", journal_mode.as_str(), |row| {
            row.get(0)
        })
        .map_err(from_rusqlite)?;

    Ok(())
}

/// Run `f` inside `SAVEPOINT name`
///
/// On success the savepoint is released; on failure everything `f` did is
/// rolled back and the error is returned. Works both with and without an
/// enclosing transaction, so repository calls stay atomic when a caller
/// composes several of them in its own transaction.
pub fn with_savepoint<T, F>(conn: &Connection, name: &'static str, f: F) -> Result<T>
where
    F: FnOnce(&Connection) -> Result<T>,
{
    conn.execute_batch(&format!("SAVEPOINT {}", name))
        .map_err(from_rusqlite)?;

    match f(conn) {
        Ok(value) => {
            conn.execute_batch(&format!("RELEASE {}", name))
                .map_err(from_rusqlite)?;
            Ok(value)
        }
        Err(err) => {
            // keep the original error even if the rollback itself fails
            let _ = conn.execute_batch(&format!("ROLLBACK TO {name}; RELEASE {name}"));
            Err(err)
        }
    }
}
