//! Publish scheduling, execution, recovery, and the global gate.
//!
//! This crate owns the time-driven half of the content pipeline:
//!
//! - [`PublishScheduler`] turns an approval decision into a time-boxed
//!   publish job, enforcing posting cadence and keeping at most one
//!   deferred registration per (item, platform).
//! - [`JobExecutor`] runs when a scheduled time arrives: it reads the
//!   global pause gate fresh, verifies preconditions, consults the call
//!   budget, dispatches to the platform publisher under a fixed timeout,
//!   and applies success, retry, or terminal-failure outcomes.
//! - [`RecoveryCoordinator`] executes post-publish takedown requests,
//!   branching on the platform's delete capability and archiving the
//!   item either way.
//! - [`PublishGate`] is the cross-cutting pause/resume control that
//!   every executor run consults at dispatch time.
//!
//! Concurrency model: each registration is one tokio task; the
//! registration map is the single trigger point, so at most one dispatch
//! is in flight per (item, platform). Registrations are replaced, never
//! duplicated, and an in-flight dispatch always runs to completion.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod executor;
mod gate;
mod recovery;
mod scheduler;
mod sink;

pub use executor::{backoff_delay, ExecOutcome, JobExecutor, PublishSettings};
pub use gate::{PublishGate, ResumeOutcome, ResumeTicket};
pub use recovery::RecoveryCoordinator;
pub use scheduler::{apply_cadence, PublishScheduler};
pub use sink::TracingSink;

use cadenza_core::Platform;
use uuid::Uuid;

/// The scheduling key: one registration, one active job per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{}/{}", item_id, platform)]
pub struct JobKey {
    /// The content item
    pub item_id: Uuid,
    /// The target platform
    pub platform: Platform,
}

impl JobKey {
    /// Create a key.
    pub fn new(item_id: Uuid, platform: Platform) -> Self {
        Self { item_id, platform }
    }
}
