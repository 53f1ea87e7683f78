use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One competency element type (Competence, Indicator, Knowledge, ...)
///
/// `is_deleted` is a soft-delete marker. A type referenced by elements or
/// hierarchy edges cannot be removed outright, only flagged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub is_deleted: bool,
}

impl DictionaryEntry {
    /// Orderable columns of `cqc_elem_dict`
    pub const COLUMNS: &'static [&'static str] = &["id", "name", "is_deleted"];
    pub const TABLE: &'static str = "cqc_elem_dict";
    pub const NAME_MAX_LEN: usize = 150;

    /// New live entry with a random id
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    pub fn with_id(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_deleted: false,
        }
    }
}

impl std::fmt::Display for DictionaryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)?;
        if self.is_deleted {
            f.write_str(" (deleted)")?;
        }
        Ok(())
    }
}
