//! Boundary traits for the Cadenza publish pipeline.
//!
//! This crate defines the contracts at the subsystem's edges: the
//! platform publisher capability, the notification sink, and the
//! persistence traits. The pipeline never implements the actual network
//! call or the durable backend — it only branches on these contracts.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod notify;
mod publisher;
mod repository;

pub use notify::NotificationSink;
pub use publisher::Publisher;
pub use repository::{
    AuditLog, ContentRepository, JobRepository, PauseStateStore, RecoveryRepository,
};
