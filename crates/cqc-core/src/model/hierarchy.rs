use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DictionaryEntry;

/// "An element of type `child` may sit under an element of type `parent`"
///
/// Identified by the pair of type ids. Reads resolve both ends to full
/// dictionary entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HierarchyEdge {
    pub parent: DictionaryEntry,
    pub child: DictionaryEntry,
}

impl HierarchyEdge {
    pub const TABLE: &'static str = "cqc_elem_hierarchy";

    pub fn new(parent: DictionaryEntry, child: DictionaryEntry) -> Self {
        Self { parent, child }
    }

    pub fn parent_type_id(&self) -> Uuid {
        self.parent.id
    }

    pub fn child_type_id(&self) -> Uuid {
        self.child.id
    }

    /// Composite key (parent_type_id, child_type_id)
    pub fn key(&self) -> (Uuid, Uuid) {
        (self.parent.id, self.child.id)
    }
}

impl std::fmt::Display for HierarchyEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.parent.name, self.child.name)
    }
}
