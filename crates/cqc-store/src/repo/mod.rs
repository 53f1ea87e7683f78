//! Repositories over the CQC tables
//!
//! Each repository is a unit struct of associated functions taking
//! `&Connection`, so a `Transaction` can be passed just as well.
//! Multi-statement operations run inside their own savepoint.

pub mod course_repo;
pub mod dictionary_repo;
pub mod element_repo;
pub mod hierarchy_repo;
pub mod leaf_link_repo;
mod rows;

pub use course_repo::CourseRepo;
pub use dictionary_repo::DictionaryRepo;
pub use element_repo::ElementRepo;
pub use hierarchy_repo::HierarchyRepo;
pub use leaf_link_repo::CourseLeafLinkRepo;

use std::time::Instant;

use cqc_core::{log_op_end, log_op_error};

use crate::errors::Result;

/// Close an operation opened with `log_op_start!`: log the end or error
/// event and stamp the operation name onto a failure
pub(crate) fn finish<T>(op: &'static str, start: Instant, result: Result<T>) -> Result<T> {
    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(value) => {
            log_op_end!(op, duration_ms = duration_ms);
            Ok(value)
        }
        Err(err) => {
            let err = err.with_op(op);
            log_op_error!(op, err.clone(), duration_ms = duration_ms);
            Err(err)
        }
    }
}
