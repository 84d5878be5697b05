//! Top-level error wrapper types.

use crate::{ConfigError, LifecycleError, PublishError, StoreError};

/// The foundation error enum for the workspace.
///
/// # Examples
///
/// ```
/// use cadenza_error::{CadenzaError, ConfigError};
///
/// let cfg_err = ConfigError::new("bad value");
/// let err: CadenzaError = cfg_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CadenzaErrorKind {
    /// Lifecycle state machine error
    #[from(LifecycleError)]
    Lifecycle(LifecycleError),
    /// Publish dispatch error
    #[from(PublishError)]
    Publish(PublishError),
    /// Persistence error
    #[from(StoreError)]
    Store(StoreError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Cadenza error with kind discrimination.
///
/// # Examples
///
/// ```
/// use cadenza_error::{CadenzaResult, StoreError, StoreErrorKind};
///
/// fn might_fail() -> CadenzaResult<()> {
///     Err(StoreError::new(StoreErrorKind::Unavailable("pool closed".to_string())))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Cadenza Error: {}", _0)]
pub struct CadenzaError(Box<CadenzaErrorKind>);

impl CadenzaError {
    /// Create a new error from a kind.
    pub fn new(kind: CadenzaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CadenzaErrorKind {
        &self.0
    }

    /// Whether this error reports a missing row or item.
    pub fn is_not_found(&self) -> bool {
        match self.kind() {
            CadenzaErrorKind::Store(e) => {
                matches!(e.kind, crate::StoreErrorKind::NotFound(_))
            }
            CadenzaErrorKind::Lifecycle(e) => {
                matches!(e.kind, crate::LifecycleErrorKind::NotFound(_))
            }
            _ => false,
        }
    }
}

// Generic From implementation for any type that converts to CadenzaErrorKind
impl<T> From<T> for CadenzaError
where
    T: Into<CadenzaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Cadenza operations.
///
/// # Examples
///
/// ```
/// use cadenza_error::{CadenzaResult, ConfigError};
///
/// fn load() -> CadenzaResult<String> {
///     Err(ConfigError::new("no such file"))?
/// }
/// ```
pub type CadenzaResult<T> = std::result::Result<T, CadenzaError>;
