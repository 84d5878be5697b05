//! Lifecycle state machine error types.

/// Kinds of lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum LifecycleErrorKind {
    /// The requested status change is not permitted from the current status
    #[display("Invalid transition from '{}' to '{}' (allowed: {:?})", current, requested, allowed)]
    InvalidTransition {
        /// Status the item currently holds
        current: String,
        /// Status the caller attempted to move to
        requested: String,
        /// Statuses reachable from the current one
        allowed: Vec<String>,
    },
    /// No content item exists with the given id
    #[display("Content item not found: {}", _0)]
    NotFound(String),
}

/// Lifecycle error with location tracking.
///
/// # Examples
///
/// ```
/// use cadenza_error::{LifecycleError, LifecycleErrorKind};
///
/// let err = LifecycleError::new(LifecycleErrorKind::NotFound("item 7".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Lifecycle Error: {} at line {} in {}", kind, line, file)]
pub struct LifecycleError {
    /// The kind of error that occurred
    pub kind: LifecycleErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl LifecycleError {
    /// Create a new lifecycle error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LifecycleErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
