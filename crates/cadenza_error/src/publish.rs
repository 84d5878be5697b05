//! Publish dispatch error types.

/// Kinds of publish errors.
///
/// The kind determines retry behavior: credential and permanent failures
/// are terminal on first occurrence, while transient, rate-limit, and
/// timeout failures are retried with backoff up to the configured cap.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PublishErrorKind {
    /// Credential or permission failure, never retried
    #[display("Authentication failed: {}", _0)]
    Auth(String),
    /// The platform refused the call for quota reasons
    #[display("Rate limited by platform: {}", _0)]
    RateLimited(String),
    /// Network or availability fault, safe to retry
    #[display("Transient failure: {}", _0)]
    Transient(String),
    /// The platform rejected the content itself, never retried
    #[display("Permanent failure: {}", _0)]
    Permanent(String),
    /// A precondition on the content is missing, never retried
    #[display("Structural failure: {}", _0)]
    Structural(String),
    /// The dispatch did not complete within the configured window
    #[display("Dispatch timed out after {}s", _0)]
    Timeout(u64),
}

impl PublishErrorKind {
    /// Whether a failure of this kind should be retried with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited(_) | Self::Transient(_) | Self::Timeout(_)
        )
    }
}

/// Publish error with location tracking.
///
/// # Examples
///
/// ```
/// use cadenza_error::{PublishError, PublishErrorKind};
///
/// let err = PublishError::new(PublishErrorKind::Transient("503 from upstream".to_string()));
/// assert!(err.kind.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Publish Error: {} at line {} in {}", kind, line, file)]
pub struct PublishError {
    /// The kind of error that occurred
    pub kind: PublishErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PublishError {
    /// Create a new publish error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PublishErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
