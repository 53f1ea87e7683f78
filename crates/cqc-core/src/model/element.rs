use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DictionaryEntry;

/// A concrete node of the competency tree
///
/// `parent_id` is `None` exactly when `element_type` is a root type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Element {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub element_type: DictionaryEntry,
    pub value: String,
}

impl Element {
    /// Orderable columns of `cqc_elem`
    pub const COLUMNS: &'static [&'static str] = &["id", "parent_id", "type_id", "value"];
    pub const TABLE: &'static str = "cqc_elem";
    pub const VALUE_MAX_LEN: usize = 250;

    pub fn new(
        element_type: DictionaryEntry,
        parent_id: Option<Uuid>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_id,
            element_type,
            value: value.into(),
        }
    }

    /// Root element (no parent)
    pub fn root(element_type: DictionaryEntry, value: impl Into<String>) -> Self {
        Self::new(element_type, None, value)
    }

    /// Element placed under `parent`
    pub fn child_of(
        parent: &Element,
        element_type: DictionaryEntry,
        value: impl Into<String>,
    ) -> Self {
        Self::new(element_type, Some(parent.id), value)
    }

    pub fn type_id(&self) -> Uuid {
        self.element_type.id
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
