//! CQC Core - domain model and rules for the qualification competency hierarchy
//!
//! This crate provides:
//! - Dictionary, hierarchy edge, element and course models
//! - The paging/ordering parameter surface shared by every listing
//! - Pure validation rules (field limits, type-graph cycles, course leaf closure)
//! - The error facility (`ExError`, `ExErrorKind`, `CqcError`)
//! - The structured logging facility

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod query;
pub mod rules;

/// Re-exported so the logging macros resolve schema constants from any crate
pub use cqc_core_types as core_types;

pub use errors::{CqcError, ExError, ExErrorKind, Result};
pub use model::{Course, DictionaryEntry, Element, HierarchyEdge, LeafDirection, LeafGroups};
pub use query::{Page, SortOrder};
