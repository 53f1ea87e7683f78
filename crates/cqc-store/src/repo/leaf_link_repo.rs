//! `course_input_leaf_link` / `course_output_leaf_link` repository
//!
//! Raw link rows. `CourseRepo` is the usual entry point; this exists for
//! callers that maintain links directly.

use std::time::Instant;

use cqc_core::log_op_start;
use cqc_core::model::{CourseLeafLink, LeafDirection};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::with_savepoint;
use crate::errors::{from_rusqlite, Result};
use crate::repo::finish;
use crate::repo::rows::uuid_at;

/// Course leaf links for either direction
pub struct CourseLeafLinkRepo;

impl CourseLeafLinkRepo {
    /// Up to `limit` links in insertion order
    ///
    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn select_all(
        conn: &Connection,
        direction: LeafDirection,
        limit: u32,
    ) -> Result<Vec<CourseLeafLink>> {
        log_op_start!("leaf_link_select_all", direction = direction.as_str(), limit = limit);
        let start = Instant::now();
        let sql = format!(
            "SELECT course_id, leaf_id FROM {} ORDER BY rowid LIMIT ?1",
            direction.link_table()
        );
        let result = query_links(conn, &sql, params![limit]);
        finish("leaf_link_select_all", start, result)
    }

    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn select_by_composite_key(
        conn: &Connection,
        direction: LeafDirection,
        course_id: Uuid,
        leaf_id: Uuid,
    ) -> Result<Option<CourseLeafLink>> {
        log_op_start!(
            "leaf_link_select_by_composite_key",
            direction = direction.as_str(),
            course_id = %course_id,
            element_id = %leaf_id
        );
        let start = Instant::now();
        let result = conn
            .query_row(
                &format!(
                    "SELECT course_id, leaf_id FROM {} WHERE course_id = ?1 AND leaf_id = ?2",
                    direction.link_table()
                ),
                [course_id.to_string(), leaf_id.to_string()],
                link_from_row,
            )
            .optional()
            .map_err(from_rusqlite);
        finish("leaf_link_select_by_composite_key", start, result)
    }

    /// All links of one course in insertion order
    ///
    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn select_by_course_id(
        conn: &Connection,
        direction: LeafDirection,
        course_id: Uuid,
    ) -> Result<Vec<CourseLeafLink>> {
        log_op_start!(
            "leaf_link_select_by_course_id",
            direction = direction.as_str(),
            course_id = %course_id
        );
        let start = Instant::now();
        let sql = format!(
            "SELECT course_id, leaf_id FROM {} WHERE course_id = ?1 ORDER BY rowid",
            direction.link_table()
        );
        let result = query_links(conn, &sql, params![course_id.to_string()]);
        finish("leaf_link_select_by_course_id", start, result)
    }

    /// # Errors
    ///
    /// `UniqueConstraintViolation` for a duplicate link,
    /// `ForeignKeyViolation` for an unknown course or element.
    pub fn insert(
        conn: &Connection,
        direction: LeafDirection,
        link: &CourseLeafLink,
    ) -> Result<usize> {
        log_op_start!(
            "leaf_link_insert",
            direction = direction.as_str(),
            course_id = %link.course_id,
            element_id = %link.leaf_id
        );
        let start = Instant::now();
        let result = insert_link(conn, direction, link);
        finish("leaf_link_insert", start, result)
    }

    /// Insert all links or none
    ///
    /// # Errors
    ///
    /// As [`CourseLeafLinkRepo::insert`] for the first failing link.
    pub fn multi_insert(
        conn: &Connection,
        direction: LeafDirection,
        links: &[CourseLeafLink],
    ) -> Result<usize> {
        log_op_start!(
            "leaf_link_multi_insert",
            direction = direction.as_str(),
            count = links.len()
        );
        let start = Instant::now();
        let result = with_savepoint(conn, "leaf_link_multi_insert", |conn| {
            let mut inserted = 0;
            for link in links {
                inserted += insert_link(conn, direction, link)?;
            }
            Ok(inserted)
        });
        finish("leaf_link_multi_insert", start, result)
    }

    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn delete_by_composite_key(
        conn: &Connection,
        direction: LeafDirection,
        course_id: Uuid,
        leaf_id: Uuid,
    ) -> Result<usize> {
        log_op_start!(
            "leaf_link_delete_by_composite_key",
            direction = direction.as_str(),
            course_id = %course_id,
            element_id = %leaf_id
        );
        let start = Instant::now();
        let result = conn
            .execute(
                &format!(
                    "DELETE FROM {} WHERE course_id = ?1 AND leaf_id = ?2",
                    direction.link_table()
                ),
                [course_id.to_string(), leaf_id.to_string()],
            )
            .map_err(from_rusqlite);
        finish("leaf_link_delete_by_composite_key", start, result)
    }

    /// Remove every link of one course; returns how many were removed
    ///
    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn delete_by_course_id(
        conn: &Connection,
        direction: LeafDirection,
        course_id: Uuid,
    ) -> Result<usize> {
        log_op_start!(
            "leaf_link_delete_by_course_id",
            direction = direction.as_str(),
            course_id = %course_id
        );
        let start = Instant::now();
        let result = delete_course_links(conn, direction, course_id);
        finish("leaf_link_delete_by_course_id", start, result)
    }
}

fn link_from_row(row: &Row<'_>) -> rusqlite::Result<CourseLeafLink> {
    Ok(CourseLeafLink {
        course_id: uuid_at(row, 0)?,
        leaf_id: uuid_at(row, 1)?,
    })
}

fn query_links(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<CourseLeafLink>> {
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let links = stmt
        .query_map(params, link_from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(links)
}

pub(crate) fn insert_link(
    conn: &Connection,
    direction: LeafDirection,
    link: &CourseLeafLink,
) -> Result<usize> {
    conn.execute(
        &format!(
            "INSERT INTO {} (course_id, leaf_id) VALUES (?1, ?2)",
            direction.link_table()
        ),
        [link.course_id.to_string(), link.leaf_id.to_string()],
    )
    .map_err(from_rusqlite)
}

pub(crate) fn delete_course_links(
    conn: &Connection,
    direction: LeafDirection,
    course_id: Uuid,
) -> Result<usize> {
    conn.execute(
        &format!("DELETE FROM {} WHERE course_id = ?1", direction.link_table()),
        [course_id.to_string()],
    )
    .map_err(from_rusqlite)
}
