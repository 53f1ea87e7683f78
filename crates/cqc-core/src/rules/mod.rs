//! Domain rules checked in Rust before statements reach the store.
//!
//! Parent/type compatibility of single elements is enforced by store
//! triggers; the rules here cover what needs a whole-graph or whole-course
//! view.

pub mod course;
pub mod hierarchy;
pub mod validation;
