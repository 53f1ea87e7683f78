//! Shared vocabulary for the CQC error and logging facilities
//!
//! - **Correlation types**: `RequestId`, `TraceId`, `RequestContext`
//! - **Schema constants**: structured log field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
