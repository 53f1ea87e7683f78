//! `cqc_elem_dict` repository

use std::time::Instant;

use cqc_core::model::DictionaryEntry;
use cqc_core::query::Page;
use cqc_core::rules::validation::validate_dictionary_entry;
use cqc_core::{log_op_start, ExError};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::with_savepoint;
use crate::errors::{from_rusqlite, on_delete, Result};
use crate::repo::finish;
use crate::repo::rows::dictionary_entry_at;

const SELECT_ENTRY: &str = "SELECT id, name, is_deleted FROM cqc_elem_dict";

/// Element type dictionary
pub struct DictionaryRepo;

impl DictionaryRepo {
    /// One page of entries
    ///
    /// # Errors
    ///
    /// `UnknownColumn` if `page.order_by` is not a dictionary column.
    pub fn select_all(conn: &Connection, page: &Page) -> Result<Vec<DictionaryEntry>> {
        log_op_start!("dictionary_select_all", limit = page.limit, offset = page.offset);
        let start = Instant::now();
        let result = Self::select_page(conn, page);
        finish("dictionary_select_all", start, result)
    }

    fn select_page(conn: &Connection, page: &Page) -> Result<Vec<DictionaryEntry>> {
        let column = page
            .order_column(DictionaryEntry::TABLE, DictionaryEntry::COLUMNS)
            .map_err(ExError::from)?;
        let sql = format!(
            "{} ORDER BY {} {}, id LIMIT ?1 OFFSET ?2",
            SELECT_ENTRY,
            column,
            page.order.as_sql()
        );
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let entries = stmt
            .query_map(params![page.limit, page.offset], |row| dictionary_entry_at(row, 0))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(entries)
    }

    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn select_by_id(conn: &Connection, id: Uuid) -> Result<Option<DictionaryEntry>> {
        log_op_start!("dictionary_select_by_id", type_id = %id);
        let start = Instant::now();
        let result = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_ENTRY),
                [id.to_string()],
                |row| dictionary_entry_at(row, 0),
            )
            .optional()
            .map_err(from_rusqlite);
        finish("dictionary_select_by_id", start, result)
    }

    /// Lookup by the unique type name
    ///
    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn select_by_name(conn: &Connection, name: &str) -> Result<Option<DictionaryEntry>> {
        log_op_start!("dictionary_select_by_name", name = name);
        let start = Instant::now();
        let result = conn
            .query_row(
                &format!("{} WHERE name = ?1", SELECT_ENTRY),
                [name],
                |row| dictionary_entry_at(row, 0),
            )
            .optional()
            .map_err(from_rusqlite);
        finish("dictionary_select_by_name", start, result)
    }

    /// # Errors
    ///
    /// `UniqueConstraintViolation` if the id or name is taken,
    /// `InvalidInput` for a blank or over-long name.
    pub fn insert(conn: &Connection, entry: &DictionaryEntry) -> Result<Uuid> {
        log_op_start!("dictionary_insert", type_id = %entry.id);
        let start = Instant::now();
        let result = insert_row(conn, entry).map(|_| entry.id);
        finish("dictionary_insert", start, result)
    }

    /// Insert all entries or none
    ///
    /// # Errors
    ///
    /// As [`DictionaryRepo::insert`] for the first failing entry; nothing
    /// from the batch remains.
    pub fn multi_insert(conn: &Connection, entries: &[DictionaryEntry]) -> Result<usize> {
        log_op_start!("dictionary_multi_insert", count = entries.len());
        let start = Instant::now();
        let result = with_savepoint(conn, "dictionary_multi_insert", |conn| {
            for entry in entries {
                insert_row(conn, entry)?;
            }
            Ok(entries.len())
        });
        finish("dictionary_multi_insert", start, result)
    }

    /// Rewrite name and soft-delete flag; returns the affected row count
    ///
    /// # Errors
    ///
    /// `UniqueConstraintViolation` if the new name belongs to another entry.
    pub fn update(conn: &Connection, entry: &DictionaryEntry) -> Result<usize> {
        log_op_start!("dictionary_update", type_id = %entry.id);
        let start = Instant::now();
        let result = validate_dictionary_entry(entry)
            .map_err(ExError::from)
            .and_then(|_| {
                conn.execute(
                    "UPDATE cqc_elem_dict SET name = ?1, is_deleted = ?2 WHERE id = ?3",
                    params![entry.name, entry.is_deleted, entry.id.to_string()],
                )
                .map_err(from_rusqlite)
            });
        finish("dictionary_update", start, result)
    }

    /// Physically remove an entry; 0 if it did not exist
    ///
    /// # Errors
    ///
    /// `ReferentialDeleteBlocked` while elements or hierarchy edges use the
    /// type.
    pub fn delete_by_id(conn: &Connection, id: Uuid) -> Result<usize> {
        log_op_start!("dictionary_delete_by_id", type_id = %id);
        let start = Instant::now();
        let result = conn
            .execute("DELETE FROM cqc_elem_dict WHERE id = ?1", [id.to_string()])
            .map_err(|e| on_delete(from_rusqlite(e)));
        finish("dictionary_delete_by_id", start, result)
    }

    /// Flag an entry as deleted without removing it; 0 if it did not exist
    ///
    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn soft_delete_by_id(conn: &Connection, id: Uuid) -> Result<usize> {
        log_op_start!("dictionary_soft_delete_by_id", type_id = %id);
        let start = Instant::now();
        let result = conn
            .execute(
                "UPDATE cqc_elem_dict SET is_deleted = 1 WHERE id = ?1",
                [id.to_string()],
            )
            .map_err(from_rusqlite);
        finish("dictionary_soft_delete_by_id", start, result)
    }
}

fn insert_row(conn: &Connection, entry: &DictionaryEntry) -> Result<()> {
    validate_dictionary_entry(entry)?;
    conn.execute(
        "INSERT INTO cqc_elem_dict (id, name, is_deleted) VALUES (?1, ?2, ?3)",
        params![entry.id.to_string(), entry.name, entry.is_deleted],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}
