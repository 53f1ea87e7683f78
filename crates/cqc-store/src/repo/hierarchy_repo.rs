//! `cqc_elem_hierarchy` repository
//!
//! Inserting an edge from a fresh type onto a type that already has parents
//! splices the fresh type in between. Deleting a middle edge relinks the
//! level below to the level above. Both happen in store triggers; cycles
//! are refused here before the insert. Every edge change is rolled back if
//! the resulting hierarchy no longer accepts an element already stored.

use std::time::Instant;

use cqc_core::errors::CqcError;
use cqc_core::log_op_start;
use cqc_core::model::{DictionaryEntry, HierarchyEdge};
use cqc_core::rules::hierarchy::{check_new_edge, type_levels};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::with_savepoint;
use crate::errors::{from_rusqlite, Result};
use crate::repo::finish;
use crate::repo::rows::{dictionary_entry_at, uuid_at};

const SELECT_EDGE: &str = "SELECT p.id, p.name, p.is_deleted, c.id, c.name, c.is_deleted
     FROM cqc_elem_hierarchy h
     JOIN cqc_elem_dict p ON p.id = h.parent_type_id
     JOIN cqc_elem_dict c ON c.id = h.child_type_id";

// first element whose placement the current edges reject
const SELECT_MISPLACED: &str = "SELECT e.id
     FROM cqc_elem e
     LEFT JOIN cqc_elem p ON p.id = e.parent_id
     WHERE (e.parent_id IS NULL
            AND EXISTS (SELECT 1 FROM cqc_elem_hierarchy h WHERE h.child_type_id = e.type_id))
        OR (e.parent_id IS NOT NULL
            AND NOT EXISTS (
                SELECT 1 FROM cqc_elem_hierarchy h
                WHERE h.parent_type_id = p.type_id AND h.child_type_id = e.type_id
            ))
     ORDER BY e.rowid
     LIMIT 1";

/// Permitted parent-type to child-type edges
pub struct HierarchyRepo;

impl HierarchyRepo {
    /// Up to `limit` edges in insertion order
    ///
    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn select_all(conn: &Connection, limit: u32) -> Result<Vec<HierarchyEdge>> {
        log_op_start!("hierarchy_select_all", limit = limit);
        let start = Instant::now();
        let result = select_edges(conn, Some(limit));
        finish("hierarchy_select_all", start, result)
    }

    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn select_by_composite_key(
        conn: &Connection,
        parent_type_id: Uuid,
        child_type_id: Uuid,
    ) -> Result<Option<HierarchyEdge>> {
        log_op_start!(
            "hierarchy_select_by_composite_key",
            parent_type_id = %parent_type_id,
            child_type_id = %child_type_id
        );
        let start = Instant::now();
        let result = conn
            .query_row(
                &format!(
                    "{} WHERE h.parent_type_id = ?1 AND h.child_type_id = ?2",
                    SELECT_EDGE
                ),
                [parent_type_id.to_string(), child_type_id.to_string()],
                edge_from_row,
            )
            .optional()
            .map_err(from_rusqlite);
        finish("hierarchy_select_by_composite_key", start, result)
    }

    /// Returns the number of rows inserted (1)
    ///
    /// # Errors
    ///
    /// - `UniqueConstraintViolation` if the edge exists
    /// - `ForeignKeyViolation` if either type is unknown
    /// - `HierarchyViolation` if the edge would close a cycle, or if the
    ///   edge (or the splice it triggers) strands an existing element
    pub fn insert(conn: &Connection, edge: &HierarchyEdge) -> Result<usize> {
        log_op_start!(
            "hierarchy_insert",
            parent_type_id = %edge.parent_type_id(),
            child_type_id = %edge.child_type_id()
        );
        let start = Instant::now();
        let result = with_savepoint(conn, "hierarchy_insert", |conn| {
            let inserted = insert_edge(conn, edge)?;
            check_placements(conn)?;
            Ok(inserted)
        });
        finish("hierarchy_insert", start, result)
    }

    /// Insert all edges or none, in slice order
    ///
    /// # Errors
    ///
    /// As [`HierarchyRepo::insert`] for the first failing edge.
    pub fn multi_insert(conn: &Connection, edges: &[HierarchyEdge]) -> Result<usize> {
        log_op_start!("hierarchy_multi_insert", count = edges.len());
        let start = Instant::now();
        let result = with_savepoint(conn, "hierarchy_multi_insert", |conn| {
            let mut inserted = 0;
            for edge in edges {
                inserted += insert_edge(conn, edge)?;
            }
            check_placements(conn)?;
            Ok(inserted)
        });
        finish("hierarchy_multi_insert", start, result)
    }

    /// Remove one edge; 0 if it did not exist
    ///
    /// # Errors
    ///
    /// `HierarchyViolation` if elements stored under the old edges would
    /// no longer fit, in which case the edge and any relink are kept as
    /// they were.
    pub fn delete_by_composite_key(
        conn: &Connection,
        parent_type_id: Uuid,
        child_type_id: Uuid,
    ) -> Result<usize> {
        log_op_start!(
            "hierarchy_delete_by_composite_key",
            parent_type_id = %parent_type_id,
            child_type_id = %child_type_id
        );
        let start = Instant::now();
        let result = with_savepoint(conn, "hierarchy_delete", |conn| {
            let deleted = conn
                .execute(
                    "DELETE FROM cqc_elem_hierarchy WHERE parent_type_id = ?1 AND child_type_id = ?2",
                    [parent_type_id.to_string(), child_type_id.to_string()],
                )
                .map_err(from_rusqlite)?;
            check_placements(conn)?;
            Ok(deleted)
        });
        finish("hierarchy_delete_by_composite_key", start, result)
    }

    /// Types from the roots downward, breadth first
    ///
    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn type_order(conn: &Connection) -> Result<Vec<DictionaryEntry>> {
        log_op_start!("hierarchy_type_order");
        let start = Instant::now();
        let result = select_edges(conn, None).map(|edges| type_levels(&edges));
        finish("hierarchy_type_order", start, result)
    }
}

fn edge_from_row(row: &Row<'_>) -> rusqlite::Result<HierarchyEdge> {
    Ok(HierarchyEdge {
        parent: dictionary_entry_at(row, 0)?,
        child: dictionary_entry_at(row, 3)?,
    })
}

fn select_edges(conn: &Connection, limit: Option<u32>) -> Result<Vec<HierarchyEdge>> {
    // LIMIT -1 is unbounded in SQLite
    let limit = limit.map(i64::from).unwrap_or(-1);
    let mut stmt = conn
        .prepare(&format!("{} ORDER BY h.rowid LIMIT ?1", SELECT_EDGE))
        .map_err(from_rusqlite)?;
    let edges = stmt
        .query_map([limit], edge_from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(edges)
}

fn edge_keys(conn: &Connection) -> Result<Vec<(Uuid, Uuid)>> {
    let mut stmt = conn
        .prepare("SELECT parent_type_id, child_type_id FROM cqc_elem_hierarchy")
        .map_err(from_rusqlite)?;
    let keys = stmt
        .query_map([], |row| Ok((uuid_at(row, 0)?, uuid_at(row, 1)?)))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(keys)
}

fn insert_edge(conn: &Connection, edge: &HierarchyEdge) -> Result<usize> {
    let keys = edge_keys(conn)?;
    check_new_edge(&keys, edge.parent_type_id(), edge.child_type_id())?;
    conn.execute(
        "INSERT INTO cqc_elem_hierarchy (parent_type_id, child_type_id) VALUES (?1, ?2)",
        params![edge.parent_type_id().to_string(), edge.child_type_id().to_string()],
    )
    .map_err(from_rusqlite)
}

fn check_placements(conn: &Connection) -> Result<()> {
    let misplaced = conn
        .query_row(SELECT_MISPLACED, [], |row| uuid_at(row, 0))
        .optional()
        .map_err(from_rusqlite)?;
    match misplaced {
        Some(element_id) => Err(CqcError::MisplacedElement { element_id }.into()),
        None => Ok(()),
    }
}
