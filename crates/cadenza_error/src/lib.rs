//! Error types for the Cadenza publish pipeline.
//!
//! This crate provides the foundation error types used throughout the
//! Cadenza workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use cadenza_error::{CadenzaResult, StoreError, StoreErrorKind};
//!
//! fn fetch_row() -> CadenzaResult<String> {
//!     Err(StoreError::new(StoreErrorKind::NotFound("job 42".to_string())))?
//! }
//!
//! match fetch_row() {
//!     Ok(row) => println!("Got: {}", row),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod lifecycle;
mod publish;
mod store;

pub use config::ConfigError;
pub use error::{CadenzaError, CadenzaErrorKind, CadenzaResult};
pub use lifecycle::{LifecycleError, LifecycleErrorKind};
pub use publish::{PublishError, PublishErrorKind};
pub use store::{StoreError, StoreErrorKind};
