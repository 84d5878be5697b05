//! Cadenza - Content Lifecycle and Publish Pipeline
//!
//! Cadenza automates the publishing half of multi-account social-media
//! content production: it takes an approved piece of content, enforces
//! posting cadence, schedules it for a future wall-clock time,
//! dispatches it to a platform publisher with bounded retries and
//! backoff, and supports cross-cutting pause/resume and post-publish
//! takedown.
//!
//! # Features
//!
//! - **Lifecycle State Machine**: validated status transitions with an
//!   append-only audit trail
//! - **Publish Scheduler**: cadence enforcement (minimum spacing, weekly
//!   caps) with replace-keyed deferred execution
//! - **Executor**: pause-gate checks, precondition checks, call budgets,
//!   bounded-timeout dispatch, 2/4/8-minute retry backoff
//! - **Recovery**: platform-capability-dependent takedown that archives
//!   rather than deletes
//! - **Global Publish Gate**: bulk pause/resume with optional two-step
//!   confirmation
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use cadenza::{
//!     ContentStatus, JobExecutor, LifecycleMachine, MemoryStore, Platform,
//!     PublishScheduler, PublishSettings, PublishWindow, TracingSink,
//! };
//! use chrono::{Duration, Utc};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> cadenza::CadenzaResult<()> {
//!     let store = MemoryStore::new();
//!     let lifecycle = LifecycleMachine::new(
//!         Arc::new(store.clone()),
//!         Arc::new(store.clone()),
//!     );
//!     let executor = Arc::new(JobExecutor::new(
//!         Arc::new(store.clone()),
//!         Arc::new(store.clone()),
//!         lifecycle.clone(),
//!         my_publisher(),
//!         Arc::new(TracingSink),
//!         Arc::new(PublishWindow::new(3600, 25)),
//!         Arc::new(store.clone()),
//!         PublishSettings::default(),
//!     ));
//!     let scheduler = PublishScheduler::new(
//!         Arc::new(store.clone()),
//!         Arc::new(store.clone()),
//!         executor,
//!     );
//!
//!     let item_id = approve_something(&lifecycle).await?;
//!     scheduler
//!         .schedule(item_id, Platform::Mastodon, Utc::now() + Duration::hours(2), None)
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Cadenza is organized as a workspace with focused crates:
//!
//! - `cadenza_core` - Domain types (ContentItem, PublishJob, etc.)
//! - `cadenza_interface` - Publisher, sink, and persistence traits
//! - `cadenza_error` - Error types
//! - `cadenza_lifecycle` - The content lifecycle state machine
//! - `cadenza_rate_limit` - Call budgets and configuration
//! - `cadenza_store` - In-memory reference storage
//! - `cadenza_pipeline` - Scheduler, executor, recovery, and the gate
//!
//! This crate (`cadenza`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use cadenza_core::{
    telemetry, AuditEvent, CadenceRules, ContentItem, ContentStatus, JobStatus, MediaRef,
    NotificationEvent, PauseState, Platform, PublishJob, PublishPayload, PublishReceipt,
    RecoveryRecord, RecoveryStatus, RecoveryUrgency,
};
pub use cadenza_error::{
    CadenzaError, CadenzaErrorKind, CadenzaResult, ConfigError, LifecycleError,
    LifecycleErrorKind, PublishError, PublishErrorKind, StoreError, StoreErrorKind,
};
pub use cadenza_interface::{
    AuditLog, ContentRepository, JobRepository, NotificationSink, PauseStateStore, Publisher,
    RecoveryRepository,
};
pub use cadenza_lifecycle::{allowed_transitions, LifecycleMachine};
pub use cadenza_pipeline::{
    apply_cadence, backoff_delay, ExecOutcome, JobExecutor, JobKey, PublishGate, PublishScheduler,
    PublishSettings, RecoveryCoordinator, ResumeOutcome, ResumeTicket, TracingSink,
};
pub use cadenza_rate_limit::{CadenzaConfig, PublishWindow};
pub use cadenza_store::MemoryStore;
