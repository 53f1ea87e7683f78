//! Seed importer
//!
//! Resolves names and keys to ids and writes through the repositories
//! inside one transaction, so the schema triggers and course leaf checks
//! apply exactly as they do for any other caller. Any failure leaves the
//! database untouched.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use cqc_core::log_op_start;
use cqc_core::model::{Course, DictionaryEntry, Element, HierarchyEdge, LeafGroups};
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::{from_rusqlite, seed_validation, Result};
use crate::repo::{finish, CourseRepo, DictionaryRepo, ElementRepo, HierarchyRepo};
use crate::seed::digest::compute_seed_digest;
use crate::seed::format::SeedV0;
use crate::seed::parser::parse_seed_file;

/// What an import wrote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub digest: String,
    pub dictionary: usize,
    pub hierarchy: usize,
    pub elements: usize,
    pub courses: usize,
}

impl std::fmt::Display for SeedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "seed {}: {} types, {} edges, {} elements, {} courses",
            self.digest, self.dictionary, self.hierarchy, self.elements, self.courses
        )
    }
}

/// Parse, validate and import a seed file
///
/// # Errors
///
/// `SeedInvalid` for an unreadable or invalid file, otherwise as
/// [`import_seed`].
pub fn import_seed_file(conn: &mut Connection, path: &Path) -> Result<SeedReport> {
    let seed = parse_seed_file(path)?;
    import_seed(conn, &seed)
}

/// Import an already parsed seed in one transaction
///
/// # Errors
///
/// Any repository error (unique names, hierarchy violations, course leaf
/// closure). Nothing is committed on failure.
pub fn import_seed(conn: &mut Connection, seed: &SeedV0) -> Result<SeedReport> {
    log_op_start!(
        "seed_import",
        types = seed.dictionary.len(),
        elements = seed.elements.len(),
        courses = seed.courses.len()
    );
    let start = Instant::now();
    let result = import_inner(conn, seed);
    finish("seed_import", start, result)
}

fn import_inner(conn: &mut Connection, seed: &SeedV0) -> Result<SeedReport> {
    let digest = compute_seed_digest(seed)?;
    let tx = conn.transaction().map_err(from_rusqlite)?;

    let types: Vec<DictionaryEntry> = seed
        .dictionary
        .iter()
        .map(|t| DictionaryEntry {
            id: t.id.unwrap_or_else(Uuid::new_v4),
            name: t.name.clone(),
            is_deleted: t.is_deleted,
        })
        .collect();
    DictionaryRepo::multi_insert(&tx, &types)?;
    let by_name: HashMap<&str, &DictionaryEntry> =
        types.iter().map(|t| (t.name.as_str(), t)).collect();

    let edges = seed
        .hierarchy
        .iter()
        .map(|e| {
            Ok(HierarchyEdge::new(
                lookup_type(&by_name, &e.parent)?.clone(),
                lookup_type(&by_name, &e.child)?.clone(),
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    HierarchyRepo::multi_insert(&tx, &edges)?;

    let mut by_key: HashMap<&str, Element> = HashMap::new();
    let mut elements = Vec::with_capacity(seed.elements.len());
    for item in &seed.elements {
        let element_type = lookup_type(&by_name, &item.type_name)?.clone();
        let element = match &item.parent {
            Some(parent) => {
                Element::child_of(lookup_element(&by_key, parent)?, element_type, &item.value)
            }
            None => Element::root(element_type, &item.value),
        };
        by_key.insert(item.key.as_str(), element.clone());
        elements.push(element);
    }
    ElementRepo::multi_insert(&tx, &elements)?;

    let courses = seed
        .courses
        .iter()
        .map(|c| {
            let mut course = Course::new(&c.name)
                .with_inputs(leaf_groups(&by_key, &c.inputs)?)
                .with_outputs(leaf_groups(&by_key, &c.outputs)?);
            if let Some(id) = c.id {
                course.id = id;
            }
            Ok(course)
        })
        .collect::<Result<Vec<_>>>()?;
    CourseRepo::multi_insert(&tx, &courses)?;

    tx.commit().map_err(from_rusqlite)?;

    Ok(SeedReport {
        digest,
        dictionary: types.len(),
        hierarchy: edges.len(),
        elements: elements.len(),
        courses: courses.len(),
    })
}

fn lookup_type<'a>(
    by_name: &HashMap<&str, &'a DictionaryEntry>,
    name: &str,
) -> Result<&'a DictionaryEntry> {
    by_name
        .get(name)
        .copied()
        .ok_or_else(|| seed_validation(&format!("Undeclared type: {}", name)))
}

fn lookup_element<'a>(by_key: &'a HashMap<&str, Element>, key: &str) -> Result<&'a Element> {
    by_key
        .get(key)
        .ok_or_else(|| seed_validation(&format!("Undeclared element key: {}", key)))
}

fn leaf_groups(by_key: &HashMap<&str, Element>, keys: &[String]) -> Result<LeafGroups> {
    keys.iter()
        .map(|key| lookup_element(by_key, key).cloned())
        .collect()
}
