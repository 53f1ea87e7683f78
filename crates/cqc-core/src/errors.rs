use cqc_core_types::{RequestContext, RequestId, TraceId};
use thiserror::Error;
use uuid::Uuid;

/// Result type alias using the canonical `ExError`
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by the CQC crates is classified by one of these
/// kinds. Each kind maps to a stable code usable in tests and by callers
/// that need to branch on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Caller input
    InvalidInput,
    UnknownColumn,
    NotFound,

    // Store-enforced integrity
    UniqueConstraintViolation,
    ForeignKeyViolation,
    HierarchyViolation,
    ReferentialDeleteBlocked,

    // Schema and seed
    MigrationFailed,
    SeedInvalid,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::UnknownColumn => "ERR_UNKNOWN_COLUMN",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::UniqueConstraintViolation => "ERR_UNIQUE_CONSTRAINT_VIOLATION",
            ExErrorKind::ForeignKeyViolation => "ERR_FOREIGN_KEY_VIOLATION",
            ExErrorKind::HierarchyViolation => "ERR_HIERARCHY_VIOLATION",
            ExErrorKind::ReferentialDeleteBlocked => "ERR_REFERENTIAL_DELETE_BLOCKED",
            ExErrorKind::MigrationFailed => "ERR_MIGRATION_FAILED",
            ExErrorKind::SeedInvalid => "ERR_SEED_INVALID",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for the kinds raised by store constraints and triggers
    pub fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            ExErrorKind::UniqueConstraintViolation
                | ExErrorKind::ForeignKeyViolation
                | ExErrorKind::HierarchyViolation
                | ExErrorKind::ReferentialDeleteBlocked
        )
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus the
/// operation, entity and correlation context needed to debug a failure.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Stamp the request id and, when present, the trace id
    pub fn with_context(mut self, ctx: &RequestContext) -> Self {
        self.request_id = Some(ctx.request_id.clone());
        if let Some(trace_id) = &ctx.trace_id {
            self.trace_id = Some(trace_id.clone());
        }
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Replace the kind, keeping all context
    ///
    /// Used where the same low-level failure means something more specific
    /// to the calling operation (a foreign-key failure on delete is a
    /// blocked delete, not a dangling reference).
    pub fn reclassify(mut self, kind: ExErrorKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        if let Some(trace_id) = &self.trace_id {
            write!(f, " (trace_id: {})", trace_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain rule failures detected in Rust before anything reaches the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CqcError {
    #[error("Unknown column name: {column}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("Unknown sort order: {value} (expected ASC or DESC)")]
    InvalidSortOrder { value: String },

    #[error("{field} must not be empty")]
    EmptyValue { field: &'static str },

    #[error("{field} is {actual} characters long, limit is {max}")]
    ValueTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// Adding the edge would make a type its own ancestor
    #[error("Edge {parent_type_id} -> {child_type_id} would close a cycle in the type hierarchy")]
    HierarchyCycle {
        parent_type_id: Uuid,
        child_type_id: Uuid,
    },

    #[error("Element {element_id} has type {actual_type_id} but is listed under type {listed_type_id}")]
    LeafTypeMismatch {
        element_id: Uuid,
        listed_type_id: Uuid,
        actual_type_id: Uuid,
    },

    /// A leaf's parent is absent from the same leaf mapping, so the set does
    /// not trace back to a root-type element
    #[error("Element {element_id} is listed without its parent {parent_id}")]
    LeafParentMissing { element_id: Uuid, parent_id: Uuid },

    /// The type hierarchy no longer accepts where a stored element sits
    #[error("Element {element_id} would no longer fit the type hierarchy")]
    MisplacedElement { element_id: Uuid },

    #[error("Element {element_id} listed as a course leaf does not exist")]
    LeafNotFound { element_id: Uuid },

    #[error("Course not found: {course_id}")]
    CourseNotFound { course_id: Uuid },

    #[error("Seed is invalid: {reason}")]
    SeedInvalid { reason: String },
}

impl From<CqcError> for ExError {
    fn from(err: CqcError) -> Self {
        let message = err.to_string();
        match err {
            CqcError::UnknownColumn { table, .. } => ExError::new(ExErrorKind::UnknownColumn)
                .with_op(format!("{}_select_all", table))
                .with_message(message),

            CqcError::InvalidSortOrder { .. }
            | CqcError::EmptyValue { .. }
            | CqcError::ValueTooLong { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            CqcError::HierarchyCycle { child_type_id, .. } => {
                ExError::new(ExErrorKind::HierarchyViolation)
                    .with_entity_id(child_type_id)
                    .with_message(message)
            }

            CqcError::LeafTypeMismatch { element_id, .. }
            | CqcError::LeafParentMissing { element_id, .. }
            | CqcError::MisplacedElement { element_id } => {
                ExError::new(ExErrorKind::HierarchyViolation)
                    .with_entity_id(element_id)
                    .with_message(message)
            }

            CqcError::LeafNotFound { element_id } => {
                ExError::new(ExErrorKind::ForeignKeyViolation)
                    .with_entity_id(element_id)
                    .with_message(message)
            }

            CqcError::CourseNotFound { course_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(course_id)
                .with_message(message),

            CqcError::SeedInvalid { .. } => ExError::new(ExErrorKind::SeedInvalid)
                .with_op("seed_parse")
                .with_message(message),
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}
