//! Field keys and event names used by structured log events.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// CQC entity identifiers
pub const FIELD_TYPE_ID: &str = "type_id";
pub const FIELD_PARENT_TYPE_ID: &str = "parent_type_id";
pub const FIELD_CHILD_TYPE_ID: &str = "child_type_id";
pub const FIELD_ELEMENT_ID: &str = "element_id";
pub const FIELD_COURSE_ID: &str = "course_id";

// Result sizes
pub const FIELD_ROW_COUNT: &str = "row_count";
pub const FIELD_AFFECTED: &str = "affected";

pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
