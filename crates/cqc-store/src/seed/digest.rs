//! Seed digest canonicalization
//!
//! Dictionary entries and courses are sorted by name, edges by
//! `(parent, child)` and course leaf lists by key. Element order is kept
//! because it carries the parents-first constraint.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::Result;
use crate::seed::format::{SeedEdge, SeedElement, SeedV0};

#[derive(Serialize)]
struct CanonicalSeed<'a> {
    schema_version: u32,
    dictionary: Vec<CanonicalType<'a>>,
    hierarchy: Vec<&'a SeedEdge>,
    elements: &'a [SeedElement],
    courses: Vec<CanonicalCourse<'a>>,
}

#[derive(Serialize, PartialEq, Eq, PartialOrd, Ord)]
struct CanonicalType<'a> {
    name: &'a str,
    id: Option<String>,
    is_deleted: bool,
}

#[derive(Serialize, PartialEq, Eq, PartialOrd, Ord)]
struct CanonicalCourse<'a> {
    name: &'a str,
    id: Option<String>,
    inputs: Vec<&'a str>,
    outputs: Vec<&'a str>,
}

/// SHA-256 hex digest of the canonical JSON form of `seed`
///
/// # Errors
///
/// `Serialization` if the canonical form cannot be encoded.
pub fn compute_seed_digest(seed: &SeedV0) -> Result<String> {
    let mut dictionary: Vec<CanonicalType<'_>> = seed
        .dictionary
        .iter()
        .map(|t| CanonicalType {
            name: &t.name,
            id: t.id.map(|id| id.to_string()),
            is_deleted: t.is_deleted,
        })
        .collect();
    dictionary.sort();

    let mut hierarchy: Vec<&SeedEdge> = seed.hierarchy.iter().collect();
    hierarchy.sort();

    let mut courses: Vec<CanonicalCourse<'_>> = seed
        .courses
        .iter()
        .map(|c| CanonicalCourse {
            name: &c.name,
            id: c.id.map(|id| id.to_string()),
            inputs: sorted_keys(&c.inputs),
            outputs: sorted_keys(&c.outputs),
        })
        .collect();
    courses.sort();

    let canonical = CanonicalSeed {
        schema_version: seed.schema_version,
        dictionary,
        hierarchy,
        elements: &seed.elements,
        courses,
    };

    let json = serde_json::to_vec(&canonical)?;
    Ok(hex::encode(Sha256::digest(&json)))
}

fn sorted_keys(keys: &[String]) -> Vec<&str> {
    let mut sorted: Vec<&str> = keys.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted
}
