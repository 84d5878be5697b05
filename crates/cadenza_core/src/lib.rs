//! Core data types for the Cadenza publish pipeline.
//!
//! This crate defines the domain model shared by every other Cadenza
//! crate: content items and their lifecycle statuses, publish jobs,
//! recovery records, the global pause state, audit events, and the
//! payload/receipt types exchanged with platform publishers.
//!
//! Types here are plain data. Mutation rules (which status may follow
//! which, who may touch a job row) live in `cadenza_lifecycle` and
//! `cadenza_pipeline`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod audit;
mod cadence;
mod content;
mod job;
mod notification;
mod pause;
mod payload;
mod platform;
mod recovery;
pub mod telemetry;

pub use audit::AuditEvent;
pub use cadence::CadenceRules;
pub use content::{ContentItem, ContentStatus};
pub use job::{JobStatus, PublishJob};
pub use notification::NotificationEvent;
pub use pause::PauseState;
pub use payload::{MediaRef, PublishPayload, PublishReceipt};
pub use platform::Platform;
pub use recovery::{RecoveryRecord, RecoveryStatus, RecoveryUrgency};
