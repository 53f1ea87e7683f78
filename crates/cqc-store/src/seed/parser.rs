//! Seed parser with validation
//!
//! Checks what can be checked without a database: schema version, blank
//! and duplicate names, and that every name or key a seed refers to is
//! declared in the same seed. Placement rules are left to the store.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::errors::{seed_validation, Result};
use crate::seed::format::SeedV0;

/// # Errors
///
/// `SeedInvalid` if the file cannot be read, is not valid YAML, or fails
/// validation.
pub fn parse_seed_file(path: &Path) -> Result<SeedV0> {
    let content = fs::read_to_string(path).map_err(|e| {
        seed_validation(&format!(
            "Failed to read seed file {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_seed_str(&content)
}

/// # Errors
///
/// `SeedInvalid` if the text is not valid YAML or fails validation.
pub fn parse_seed_str(content: &str) -> Result<SeedV0> {
    let seed: SeedV0 = serde_yaml::from_str(content)
        .map_err(|e| seed_validation(&format!("YAML parse error: {}", e)))?;
    validate_seed(&seed)?;
    Ok(seed)
}

fn validate_seed(seed: &SeedV0) -> Result<()> {
    if seed.schema_version != 0 {
        return Err(seed_validation(&format!(
            "Unsupported schema_version: {}. Expected 0",
            seed.schema_version
        )));
    }

    let mut type_names = HashSet::new();
    let mut type_ids = HashSet::new();
    for entry in &seed.dictionary {
        require_text("dictionary name", &entry.name)?;
        if !type_names.insert(entry.name.as_str()) {
            return Err(seed_validation(&format!(
                "Duplicate dictionary name: {}",
                entry.name
            )));
        }
        if let Some(id) = entry.id {
            if !type_ids.insert(id) {
                return Err(seed_validation(&format!("Duplicate dictionary id: {}", id)));
            }
        }
    }

    let mut edges = HashSet::new();
    for edge in &seed.hierarchy {
        for name in [&edge.parent, &edge.child] {
            if !type_names.contains(name.as_str()) {
                return Err(seed_validation(&format!(
                    "Hierarchy edge references undeclared type: {}",
                    name
                )));
            }
        }
        if !edges.insert(edge) {
            return Err(seed_validation(&format!(
                "Duplicate hierarchy edge: {} -> {}",
                edge.parent, edge.child
            )));
        }
    }

    // parents must already be declared, so a seen-so-far set is enough
    let mut keys = HashSet::new();
    for element in &seed.elements {
        require_text("element key", &element.key)?;
        require_text("element value", &element.value)?;
        if !type_names.contains(element.type_name.as_str()) {
            return Err(seed_validation(&format!(
                "Element {} references undeclared type: {}",
                element.key, element.type_name
            )));
        }
        if let Some(parent) = &element.parent {
            if !keys.contains(parent.as_str()) {
                return Err(seed_validation(&format!(
                    "Element {} references parent {} which is not declared before it",
                    element.key, parent
                )));
            }
        }
        if !keys.insert(element.key.as_str()) {
            return Err(seed_validation(&format!(
                "Duplicate element key: {}",
                element.key
            )));
        }
    }

    for course in &seed.courses {
        require_text("course name", &course.name)?;
        for (direction, leaves) in [("inputs", &course.inputs), ("outputs", &course.outputs)] {
            let mut listed = HashSet::new();
            for key in leaves {
                if !keys.contains(key.as_str()) {
                    return Err(seed_validation(&format!(
                        "Course {} {} reference undeclared element: {}",
                        course.name, direction, key
                    )));
                }
                if !listed.insert(key.as_str()) {
                    return Err(seed_validation(&format!(
                        "Course {} lists element {} twice in {}",
                        course.name, key, direction
                    )));
                }
            }
        }
    }

    Ok(())
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(seed_validation(&format!("Empty {}", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cqc_core::ExErrorKind;

    const VALID: &str = r#"
schema_version: 0
dictionary:
  - name: Competence
  - name: Indicator
hierarchy:
  - parent: Competence
    child: Indicator
elements:
  - { key: c1, type: Competence, value: Competence1 }
  - { key: i1, type: Indicator, value: Indicator1, parent: c1 }
courses:
  - name: Rust 101
    inputs: [c1, i1]
"#;

    fn reason(yaml: &str) -> String {
        let err = parse_seed_str(yaml).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::SeedInvalid);
        err.to_string()
    }

    #[test]
    fn test_parse_valid_seed() {
        let seed = parse_seed_str(VALID).unwrap();
        assert_eq!(seed.dictionary.len(), 2);
        assert_eq!(seed.elements.len(), 2);
        assert_eq!(seed.courses[0].outputs.len(), 0);
    }

    #[test]
    fn test_reject_invalid_schema_version() {
        assert!(reason("schema_version: 99\n").contains("schema_version"));
    }

    #[test]
    fn test_reject_malformed_yaml() {
        assert!(reason("schema_version: [").contains("YAML parse error"));
    }

    #[test]
    fn test_reject_duplicate_type_name() {
        let yaml = r#"
schema_version: 0
dictionary:
  - name: Competence
  - name: Competence
"#;
        assert!(reason(yaml).contains("Duplicate dictionary name"));
    }

    #[test]
    fn test_reject_edge_to_undeclared_type() {
        let yaml = r#"
schema_version: 0
dictionary:
  - name: Competence
hierarchy:
  - { parent: Competence, child: Indicator }
"#;
        assert!(reason(yaml).contains("undeclared type: Indicator"));
    }

    #[test]
    fn test_reject_parent_declared_after_child() {
        let yaml = r#"
schema_version: 0
dictionary:
  - name: Competence
  - name: Indicator
elements:
  - { key: i1, type: Indicator, value: Indicator1, parent: c1 }
  - { key: c1, type: Competence, value: Competence1 }
"#;
        assert!(reason(yaml).contains("not declared before it"));
    }

    #[test]
    fn test_reject_duplicate_element_key() {
        let yaml = r#"
schema_version: 0
dictionary:
  - name: Competence
elements:
  - { key: c1, type: Competence, value: Competence1 }
  - { key: c1, type: Competence, value: Competence2 }
"#;
        assert!(reason(yaml).contains("Duplicate element key"));
    }

    #[test]
    fn test_reject_course_with_unknown_leaf() {
        let yaml = r#"
schema_version: 0
courses:
  - name: Rust 101
    outputs: [nope]
"#;
        assert!(reason(yaml).contains("undeclared element: nope"));
    }

    #[test]
    fn test_reject_blank_course_name() {
        let yaml = r#"
schema_version: 0
courses:
  - name: "  "
"#;
        assert!(reason(yaml).contains("Empty course name"));
    }
}
