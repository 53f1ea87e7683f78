//! Seed format v0
//!
//! Types and hierarchy edges are referenced by name; elements carry a
//! symbolic `key` that later elements and courses use to refer to them.
//!
//! ```yaml
//! schema_version: 0
//! dictionary:
//!   - name: Competence
//!   - name: Indicator
//! hierarchy:
//!   - { parent: Competence, child: Indicator }
//! elements:
//!   - { key: c1, type: Competence, value: Competence1 }
//!   - { key: i1, type: Indicator, value: Indicator1, parent: c1 }
//! courses:
//!   - name: Rust 101
//!     inputs: [c1, i1]
//!     outputs: []
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedV0 {
    pub schema_version: u32,

    #[serde(default)]
    pub dictionary: Vec<SeedType>,

    /// Applied in listed order, so list edges top-down
    #[serde(default)]
    pub hierarchy: Vec<SeedEdge>,

    /// Parents must be listed before their children
    #[serde(default)]
    pub elements: Vec<SeedElement>,

    #[serde(default)]
    pub courses: Vec<SeedCourse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedType {
    /// Fixed id; a fresh one is assigned when absent
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeedEdge {
    pub parent: String,
    pub child: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedElement {
    pub key: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: String,
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCourse {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    /// Element keys
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
}
