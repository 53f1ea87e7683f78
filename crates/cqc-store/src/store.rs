//! Owned connection handle with an explicit open/close lifecycle.

use std::time::Instant;

use cqc_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::{Connection, Transaction};

use crate::config::StoreConfig;
use crate::db;
use crate::errors::{from_rusqlite, Result};
use crate::migrations::apply_migrations;

/// A configured, migrated SQLite connection
///
/// Open one at process start and pass it (or `&Connection` borrowed from
/// it) to the repositories; close it at shutdown.
pub struct CqcStore {
    conn: Connection,
    config: StoreConfig,
}

impl CqcStore {
    /// # Errors
    ///
    /// `Persistence` if the database cannot be opened or configured,
    /// `MigrationFailed` if the schema cannot be brought up to date.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let path = config.database_path.display().to_string();
        log_op_start!("store_open", path = %path);
        let start = Instant::now();

        let result = Self::open_inner(config);
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => {
                log_op_end!("store_open", duration_ms = duration_ms);
            }
            Err(e) => {
                log_op_error!("store_open", e.clone(), duration_ms = duration_ms);
            }
        }
        result
    }

    fn open_inner(config: &StoreConfig) -> Result<Self> {
        let mut conn = if config.is_in_memory() {
            db::open_in_memory()?
        } else {
            db::open(&config.database_path)?
        };
        db::configure(&conn, config.journal_mode, config.busy_timeout())?;
        if config.apply_migrations {
            apply_migrations(&mut conn)?;
        }
        Ok(Self {
            conn,
            config: config.clone(),
        })
    }

    /// Private in-memory store with the schema applied
    ///
    /// # Errors
    ///
    /// As [`CqcStore::open`].
    pub fn open_in_memory() -> Result<Self> {
        Self::open(&StoreConfig::in_memory())
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// # Errors
    ///
    /// `Persistence` if a transaction is already open.
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        self.conn.transaction().map_err(from_rusqlite)
    }

    /// Close the connection, surfacing errors that a plain drop would hide
    ///
    /// # Errors
    ///
    /// `Persistence` if SQLite refuses to close (e.g. unfinalized statements).
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| from_rusqlite(e))?;
        tracing::debug!(op = "store_close", "store closed");
        Ok(())
    }
}
