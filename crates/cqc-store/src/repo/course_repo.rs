//! `course` repository
//!
//! A course row plus its input and output leaf links. Writes validate the
//! leaf mappings against the stored elements and then replace the link rows
//! inside one savepoint, so a rejected mapping leaves nothing behind.
//! Reads rebuild each mapping from the `course_*_elements` views, grouping
//! by type in order of first appearance.

use std::time::Instant;

use cqc_core::model::{Course, CourseLeafLink, LeafDirection, LeafGroups};
use cqc_core::query::Page;
use cqc_core::rules::course::check_leaf_closure;
use cqc_core::rules::validation::validate_course_name;
use cqc_core::{log_op_start, ExError};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::with_savepoint;
use crate::errors::{from_rusqlite, on_delete, Result};
use crate::repo::element_repo::ElementRepo;
use crate::repo::finish;
use crate::repo::leaf_link_repo::{delete_course_links, insert_link};
use crate::repo::rows::{element_from_row, uuid_at};

/// Courses and their leaf mappings
pub struct CourseRepo;

impl CourseRepo {
    /// One page of courses, each with both leaf mappings loaded
    ///
    /// # Errors
    ///
    /// `UnknownColumn` if `page.order_by` is not a course column.
    pub fn select_all(conn: &Connection, page: &Page) -> Result<Vec<Course>> {
        log_op_start!("course_select_all", limit = page.limit, offset = page.offset);
        let start = Instant::now();
        let result = Self::select_page(conn, page);
        finish("course_select_all", start, result)
    }

    fn select_page(conn: &Connection, page: &Page) -> Result<Vec<Course>> {
        let column = page
            .order_column(Course::TABLE, Course::COLUMNS)
            .map_err(ExError::from)?;
        let sql = format!(
            "SELECT id, name FROM course ORDER BY {} {}, id LIMIT ?1 OFFSET ?2",
            column,
            page.order.as_sql()
        );
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let heads = stmt
            .query_map(params![page.limit, page.offset], |row| {
                Ok((uuid_at(row, 0)?, row.get::<_, String>(1)?))
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        heads
            .into_iter()
            .map(|(id, name)| load_course(conn, id, name))
            .collect()
    }

    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn select_by_id(conn: &Connection, id: Uuid) -> Result<Option<Course>> {
        log_op_start!("course_select_by_id", course_id = %id);
        let start = Instant::now();
        let result = select_one(conn, id);
        finish("course_select_by_id", start, result)
    }

    /// Input leaves of a course grouped by type; empty for an unknown course
    ///
    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn input_elements(conn: &Connection, course_id: Uuid) -> Result<LeafGroups> {
        log_op_start!("course_input_elements", course_id = %course_id);
        let start = Instant::now();
        let result = load_leaves(conn, LeafDirection::Input, course_id);
        finish("course_input_elements", start, result)
    }

    /// Output leaves of a course grouped by type; empty for an unknown course
    ///
    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn output_elements(conn: &Connection, course_id: Uuid) -> Result<LeafGroups> {
        log_op_start!("course_output_elements", course_id = %course_id);
        let start = Instant::now();
        let result = load_leaves(conn, LeafDirection::Output, course_id);
        finish("course_output_elements", start, result)
    }

    /// Insert the course row and every leaf link
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a blank or over-long name
    /// - `ForeignKeyViolation` if a listed element does not exist
    /// - `HierarchyViolation` if a mapping is not parent-closed or lists an
    ///   element under the wrong type
    /// - `UniqueConstraintViolation` if the id is taken
    pub fn insert(conn: &Connection, course: &Course) -> Result<Uuid> {
        log_op_start!(
            "course_insert",
            course_id = %course.id,
            inputs = course.input_leaves.element_count(),
            outputs = course.output_leaves.element_count()
        );
        let start = Instant::now();
        let result = with_savepoint(conn, "course_insert", |conn| {
            insert_course(conn, course)?;
            Ok(course.id)
        });
        finish("course_insert", start, result)
    }

    /// Insert all courses or none
    ///
    /// # Errors
    ///
    /// As [`CourseRepo::insert`] for the first failing course.
    pub fn multi_insert(conn: &Connection, courses: &[Course]) -> Result<usize> {
        log_op_start!("course_multi_insert", count = courses.len());
        let start = Instant::now();
        let result = with_savepoint(conn, "course_multi_insert", |conn| {
            for course in courses {
                insert_course(conn, course)?;
            }
            Ok(courses.len())
        });
        finish("course_multi_insert", start, result)
    }

    /// Rename the course and replace both leaf mappings
    ///
    /// Returns 0 without touching links when the course does not exist.
    ///
    /// # Errors
    ///
    /// As [`CourseRepo::insert`], except for the id check.
    pub fn update(conn: &Connection, course: &Course) -> Result<usize> {
        log_op_start!(
            "course_update",
            course_id = %course.id,
            inputs = course.input_leaves.element_count(),
            outputs = course.output_leaves.element_count()
        );
        let start = Instant::now();
        let result = with_savepoint(conn, "course_update", |conn| {
            validate(conn, course)?;
            let updated = conn
                .execute(
                    "UPDATE course SET name = ?1 WHERE id = ?2",
                    params![course.name, course.id.to_string()],
                )
                .map_err(from_rusqlite)?;
            if updated == 0 {
                return Ok(0);
            }
            for direction in LeafDirection::ALL {
                delete_course_links(conn, direction, course.id)?;
            }
            insert_links(conn, course)?;
            Ok(updated)
        });
        finish("course_update", start, result)
    }

    /// Remove a course; its links go with it
    ///
    /// # Errors
    ///
    /// `Persistence` on database failure.
    pub fn delete_by_id(conn: &Connection, id: Uuid) -> Result<usize> {
        log_op_start!("course_delete_by_id", course_id = %id);
        let start = Instant::now();
        let result = conn
            .execute("DELETE FROM course WHERE id = ?1", [id.to_string()])
            .map_err(|e| on_delete(from_rusqlite(e)));
        finish("course_delete_by_id", start, result)
    }
}

fn select_one(conn: &Connection, id: Uuid) -> Result<Option<Course>> {
    let name: Option<String> = conn
        .query_row(
            "SELECT name FROM course WHERE id = ?1",
            [id.to_string()],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;

    name.map(|name| load_course(conn, id, name)).transpose()
}

fn load_course(conn: &Connection, id: Uuid, name: String) -> Result<Course> {
    Ok(Course {
        id,
        name,
        input_leaves: load_leaves(conn, LeafDirection::Input, id)?,
        output_leaves: load_leaves(conn, LeafDirection::Output, id)?,
    })
}

fn load_leaves(conn: &Connection, direction: LeafDirection, course_id: Uuid) -> Result<LeafGroups> {
    let sql = format!(
        "SELECT elem_id, elem_parent_id, elem_value, type_id, type_name, type_is_deleted
         FROM {}
         WHERE course_id = ?1
         ORDER BY link_order",
        direction.elements_view()
    );
    let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
    let groups = stmt
        .query_map([course_id.to_string()], element_from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<LeafGroups, _>>()
        .map_err(from_rusqlite)?;
    Ok(groups)
}

fn validate(conn: &Connection, course: &Course) -> Result<()> {
    validate_course_name(course)?;
    for direction in LeafDirection::ALL {
        let leaves = course.leaves(direction);
        let stored = ElementRepo::load_many(conn, &leaves.element_ids())?;
        check_leaf_closure(leaves, &stored)?;
    }
    Ok(())
}

fn insert_course(conn: &Connection, course: &Course) -> Result<()> {
    validate(conn, course)?;
    conn.execute(
        "INSERT INTO course (id, name) VALUES (?1, ?2)",
        params![course.id.to_string(), course.name],
    )
    .map_err(from_rusqlite)?;
    insert_links(conn, course)
}

// links go in group order, then element order, which is the order reads
// group them back by
fn insert_links(conn: &Connection, course: &Course) -> Result<()> {
    for direction in LeafDirection::ALL {
        for element in course.leaves(direction).elements() {
            insert_link(conn, direction, &CourseLeafLink::new(course.id, element.id))?;
        }
    }
    Ok(())
}
