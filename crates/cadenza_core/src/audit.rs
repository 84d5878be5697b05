//! Append-only audit trail of lifecycle transitions.

use crate::ContentStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One recorded lifecycle transition.
///
/// Events are append-only: never mutated, never deleted. Fields are
/// structured (old status, new status, actor) with a small bounded
/// key-value map for free-form metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event id
    pub id: Uuid,
    /// The item whose status changed
    pub item_id: Uuid,
    /// Status before the transition
    pub old_status: ContentStatus,
    /// Status after the transition
    pub new_status: ContentStatus,
    /// Who performed the transition
    pub actor: String,
    /// Free-form metadata, bounded by the caller
    pub details: BTreeMap<String, String>,
    /// When the transition happened
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    /// Record a transition.
    pub fn record(
        item_id: Uuid,
        old_status: ContentStatus,
        new_status: ContentStatus,
        actor: impl Into<String>,
        details: BTreeMap<String, String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            old_status,
            new_status,
            actor: actor.into(),
            details,
            created_at: Utc::now(),
        }
    }
}
