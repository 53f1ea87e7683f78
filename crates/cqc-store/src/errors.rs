//! Store-specific error constructors
//!
//! Everything is an `ExError` from cqc-core; these helpers classify SQLite
//! failures into the shared taxonomy.

use cqc_core::errors::{ExError, ExErrorKind};
use rusqlite::ffi;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Prefix of every `RAISE(ABORT, ...)` message in the hierarchy triggers
pub const HIERARCHY_VIOLATION_PREFIX: &str = "hierarchy violation";

pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::MigrationFailed)
        .with_op("migration")
        .with_entity_id(migration_id)
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::MigrationFailed)
        .with_op("migration_checksum")
        .with_entity_id(migration_id)
        .with_message(format!(
            "Checksum mismatch for migration {}: recorded {}, embedded {}",
            migration_id, expected, actual
        ))
}

pub fn seed_validation(reason: &str) -> ExError {
    ExError::new(ExErrorKind::SeedInvalid)
        .with_op("seed_parse")
        .with_message(reason.to_string())
}

pub fn config_error(reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("config")
        .with_message(reason)
}

pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Classify a rusqlite error
///
/// Constraint failures map onto the integrity kinds by extended result
/// code. Trigger aborts count as hierarchy violations only when their
/// message carries [`HIERARCHY_VIOLATION_PREFIX`].
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(failure, message) => {
            classify_failure(failure, message.as_deref())
        }
        rusqlite::Error::QueryReturnedNoRows => ExErrorKind::NotFound,
        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::InvalidColumnType(..)
        | rusqlite::Error::IntegralValueOutOfRange(..) => ExErrorKind::Serialization,
        _ => ExErrorKind::Persistence,
    };
    ExError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}

fn classify_failure(failure: &ffi::Error, message: Option<&str>) -> ExErrorKind {
    match failure.extended_code {
        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            ExErrorKind::UniqueConstraintViolation
        }
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ExErrorKind::ForeignKeyViolation,
        ffi::SQLITE_CONSTRAINT_CHECK | ffi::SQLITE_CONSTRAINT_NOTNULL => {
            ExErrorKind::InvalidInput
        }
        ffi::SQLITE_CONSTRAINT_TRIGGER
            if message.is_some_and(|m| m.starts_with(HIERARCHY_VIOLATION_PREFIX)) =>
        {
            ExErrorKind::HierarchyViolation
        }
        _ => ExErrorKind::Persistence,
    }
}

/// A foreign-key failure raised by a DELETE means rows still reference the
/// target
pub fn on_delete(err: ExError) -> ExError {
    if err.kind() == ExErrorKind::ForeignKeyViolation {
        err.reclassify(ExErrorKind::ReferentialDeleteBlocked)
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE p (id INTEGER PRIMARY KEY, name TEXT UNIQUE CHECK (length(name) < 5));
             CREATE TABLE c (id INTEGER PRIMARY KEY, p_id INTEGER REFERENCES p(id));
             CREATE TRIGGER guard BEFORE INSERT ON c WHEN NEW.id = 99
             BEGIN SELECT RAISE(ABORT, 'hierarchy violation: test'); END;
             CREATE TRIGGER other BEFORE INSERT ON c WHEN NEW.id = 98
             BEGIN SELECT RAISE(ABORT, 'something else'); END;
             INSERT INTO p (id, name) VALUES (1, 'a');",
        )
        .unwrap();
        conn
    }

    fn kind_of(conn: &Connection, sql: &str) -> ExErrorKind {
        from_rusqlite(conn.execute(sql, []).unwrap_err()).kind()
    }

    #[test]
    fn test_unique_and_primary_key() {
        let conn = conn();
        assert_eq!(
            kind_of(&conn, "INSERT INTO p (id, name) VALUES (2, 'a')"),
            ExErrorKind::UniqueConstraintViolation
        );
        assert_eq!(
            kind_of(&conn, "INSERT INTO p (id, name) VALUES (1, 'b')"),
            ExErrorKind::UniqueConstraintViolation
        );
    }

    #[test]
    fn test_foreign_key_and_delete_reclassification() {
        let conn = conn();
        assert_eq!(
            kind_of(&conn, "INSERT INTO c (id, p_id) VALUES (1, 42)"),
            ExErrorKind::ForeignKeyViolation
        );

        conn.execute("INSERT INTO c (id, p_id) VALUES (1, 1)", [])
            .unwrap();
        let err = from_rusqlite(conn.execute("DELETE FROM p WHERE id = 1", []).unwrap_err());
        assert_eq!(on_delete(err).kind(), ExErrorKind::ReferentialDeleteBlocked);
    }

    #[test]
    fn test_check_is_invalid_input() {
        let conn = conn();
        assert_eq!(
            kind_of(&conn, "INSERT INTO p (id, name) VALUES (3, 'too long')"),
            ExErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_trigger_prefix_decides_hierarchy_kind() {
        let conn = conn();
        assert_eq!(
            kind_of(&conn, "INSERT INTO c (id, p_id) VALUES (99, 1)"),
            ExErrorKind::HierarchyViolation
        );
        assert_eq!(
            kind_of(&conn, "INSERT INTO c (id, p_id) VALUES (98, 1)"),
            ExErrorKind::Persistence
        );
    }
}
