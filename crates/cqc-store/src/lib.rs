//! CQC Store - SQLite persistence for the competency hierarchy
//!
//! Provides:
//! - Connection lifecycle (`CqcStore`) and `StoreConfig`
//! - Embedded, checksummed migrations holding the schema, the hierarchy
//!   triggers and the course leaf views
//! - Repositories for dictionary entries, hierarchy edges, elements,
//!   courses and course leaf links
//! - YAML seed import

pub mod config;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod seed;
pub mod store;

pub use config::{JournalMode, StoreConfig};
pub use errors::Result;
pub use repo::{CourseLeafLinkRepo, CourseRepo, DictionaryRepo, ElementRepo, HierarchyRepo};
pub use store::CqcStore;
