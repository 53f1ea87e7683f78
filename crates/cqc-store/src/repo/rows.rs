//! Row decoding shared by the repositories.

use cqc_core::model::{DictionaryEntry, Element};
use rusqlite::types::Type;
use rusqlite::Row;
use uuid::Uuid;

pub(crate) fn uuid_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn opt_uuid_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| {
        Uuid::parse_str(&t)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// Decode `(id, name, is_deleted)` starting at column `at`
pub(crate) fn dictionary_entry_at(row: &Row<'_>, at: usize) -> rusqlite::Result<DictionaryEntry> {
    Ok(DictionaryEntry {
        id: uuid_at(row, at)?,
        name: row.get(at + 1)?,
        is_deleted: row.get(at + 2)?,
    })
}

/// Decode `(id, parent_id, value, type id, type name, type is_deleted)`
pub(crate) fn element_from_row(row: &Row<'_>) -> rusqlite::Result<Element> {
    Ok(Element {
        id: uuid_at(row, 0)?,
        parent_id: opt_uuid_at(row, 1)?,
        value: row.get(2)?,
        element_type: dictionary_entry_at(row, 3)?,
    })
}
