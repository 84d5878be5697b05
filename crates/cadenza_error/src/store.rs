//! Persistence error types.

/// Kinds of store errors.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum StoreErrorKind {
    /// No row exists for the given key
    #[display("Row not found: {}", _0)]
    NotFound(String),
    /// A row already exists where none was expected
    #[display("Conflicting row: {}", _0)]
    Conflict(String),
    /// The backend rejected or failed the operation
    #[display("Store unavailable: {}", _0)]
    Unavailable(String),
}

/// Store error with location tracking.
///
/// # Examples
///
/// ```
/// use cadenza_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::NotFound("content 9".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new store error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
