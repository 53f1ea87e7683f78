//! CQC domain model.

pub mod course;
pub mod dictionary;
pub mod element;
pub mod hierarchy;

pub use course::{Course, CourseLeafLink, LeafDirection, LeafGroups};
pub use dictionary::DictionaryEntry;
pub use element::Element;
pub use hierarchy::HierarchyEdge;
