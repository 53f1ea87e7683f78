//! `cqc_elem` repository
//!
//! Placement rules (root types have no parent, non-root types need a parent
//! of a permitted type, children must accept a changed type) are enforced
//! by triggers and surface as `HierarchyViolation`.

use std::collections::HashMap;
use std::time::Instant;

use cqc_core::model::Element;
use cqc_core::query::Page;
use cqc_core::rules::validation::validate_element;
use cqc_core::{log_op_start, ExError};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::with_savepoint;
use crate::errors::{from_rusqlite, on_delete, Result};
use crate::repo::finish;
use crate::repo::rows::element_from_row;

const SELECT_ELEMENT: &str = "SELECT e.id, e.parent_id, e.value, d.id, d.name, d.is_deleted
     FROM cqc_elem e
     JOIN cqc_elem_dict d ON d.id = e.type_id";

/// Competency tree elements
pub struct ElementRepo;

impl ElementRepo {
    /// One page of elements with their types resolved
    ///
    /// # Errors
    ///
    /// `UnknownColumn` if `page.order_by` is not an element column.
    pub fn select_all(conn: &Connection, page: &Page) -> Result<Vec<Element>> {
        log_op_start!("element_select_all", limit = page.limit, offset = page.offset);
        let start = Instant::now();
        let result = Self::select_page(conn, page);
        finish("element_select_all", start, result)
    }

    fn select_page(conn: &Connection, page: &Page) -> Result<Vec<Element>> {
        let column = page
            .order_column(Element::TABLE, Element::COLUMNS)
            .map_err(ExError::from)?;
        let sql = format!(
            "{} ORDER BY e.{} {}, e.id LIMIT ?1 OFFSET ?2",
            SELECT_ELEMENT,
            column,
            page.order.as_sql()
        );
        query_elements(conn, &sql, params![page.limit, page.offset])
    }

    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn select_by_id(conn: &Connection, id: Uuid) -> Result<Option<Element>> {
        log_op_start!("element_select_by_id", element_id = %id);
        let start = Instant::now();
        let result = select_one(conn, id);
        finish("element_select_by_id", start, result)
    }

    /// Direct children of `parent_id`, ordered by value
    ///
    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn select_children(conn: &Connection, parent_id: Uuid) -> Result<Vec<Element>> {
        log_op_start!("element_select_children", element_id = %parent_id);
        let start = Instant::now();
        let sql = format!("{} WHERE e.parent_id = ?1 ORDER BY e.value, e.id", SELECT_ELEMENT);
        let result = query_elements(conn, &sql, params![parent_id.to_string()]);
        finish("element_select_children", start, result)
    }

    /// # Errors
    ///
    /// - `HierarchyViolation` for a misplaced element
    /// - `UniqueConstraintViolation` if a sibling already has this value
    /// - `ForeignKeyViolation` for an unknown type or parent
    /// - `InvalidInput` for a blank or over-long value
    pub fn insert(conn: &Connection, element: &Element) -> Result<Uuid> {
        log_op_start!("element_insert", element_id = %element.id);
        let start = Instant::now();
        let result = insert_row(conn, element).map(|_| element.id);
        finish("element_insert", start, result)
    }

    /// Insert all elements or none, in slice order (parents before children)
    ///
    /// # Errors
    ///
    /// As [`ElementRepo::insert`] for the first failing element.
    pub fn multi_insert(conn: &Connection, elements: &[Element]) -> Result<usize> {
        log_op_start!("element_multi_insert", count = elements.len());
        let start = Instant::now();
        let result = with_savepoint(conn, "element_multi_insert", |conn| {
            for element in elements {
                insert_row(conn, element)?;
            }
            Ok(elements.len())
        });
        finish("element_multi_insert", start, result)
    }

    /// Rewrite parent, type and value; returns the affected row count
    ///
    /// # Errors
    ///
    /// As [`ElementRepo::insert`], plus `HierarchyViolation` when existing
    /// children do not accept the new type.
    pub fn update(conn: &Connection, element: &Element) -> Result<usize> {
        log_op_start!("element_update", element_id = %element.id);
        let start = Instant::now();
        let result = validate_element(element)
            .map_err(ExError::from)
            .and_then(|_| {
                conn.execute(
                    "UPDATE cqc_elem SET parent_id = ?1, type_id = ?2, value = ?3 WHERE id = ?4",
                    params![
                        element.parent_id.map(|p| p.to_string()),
                        element.type_id().to_string(),
                        element.value,
                        element.id.to_string()
                    ],
                )
                .map_err(from_rusqlite)
            });
        finish("element_update", start, result)
    }

    /// Remove an element without children; 0 if it did not exist
    ///
    /// # Errors
    ///
    /// `ReferentialDeleteBlocked` if the element has children or is linked
    /// from a course.
    pub fn delete_by_id(conn: &Connection, id: Uuid) -> Result<usize> {
        log_op_start!("element_delete_by_id", element_id = %id);
        let start = Instant::now();
        let result = conn
            .execute("DELETE FROM cqc_elem WHERE id = ?1", [id.to_string()])
            .map_err(|e| on_delete(from_rusqlite(e)));
        finish("element_delete_by_id", start, result)
    }

    /// Stored elements for the given ids; absent ids are simply missing
    /// from the map
    pub(crate) fn load_many<'a, I>(conn: &Connection, ids: I) -> Result<HashMap<Uuid, Element>>
    where
        I: IntoIterator<Item = &'a Uuid>,
    {
        let mut found = HashMap::new();
        for id in ids {
            if let Some(element) = select_one(conn, *id)? {
                found.insert(element.id, element);
            }
        }
        Ok(found)
    }
}

fn select_one(conn: &Connection, id: Uuid) -> Result<Option<Element>> {
    conn.query_row(
        &format!("{} WHERE e.id = ?1", SELECT_ELEMENT),
        [id.to_string()],
        element_from_row,
    )
    .optional()
    .map_err(from_rusqlite)
}

fn query_elements(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<Element>> {
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let elements = stmt
        .query_map(params, element_from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(elements)
}

fn insert_row(conn: &Connection, element: &Element) -> Result<()> {
    validate_element(element)?;
    conn.execute(
        "INSERT INTO cqc_elem (id, parent_id, type_id, value) VALUES (?1, ?2, ?3, ?4)",
        params![
            element.id.to_string(),
            element.parent_id.map(|p| p.to_string()),
            element.type_id().to_string(),
            element.value
        ],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}
