//! Recovery records: post-publish takedown requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How quickly a recovery request must be acted on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecoveryUrgency {
    /// Execute the takedown now
    Immediate,
    /// Park the request for human triage
    Review,
}

/// Status of a recovery request.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecoveryStatus {
    /// Created, not yet acted on
    Pending,
    /// Takedown in progress
    Executing,
    /// Platform confirmed the deletion
    Completed,
    /// The deletion attempt failed
    Failed,
    /// The platform cannot delete; a human must act
    ManualRecoveryNeeded,
}

impl RecoveryStatus {
    /// Whether the record is immutable from here on.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::ManualRecoveryNeeded
        )
    }
}

/// One post-publish takedown request.
///
/// Created by the recovery coordinator; immutable once terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryRecord {
    /// Unique record id
    pub id: Uuid,
    /// The content item being recovered
    pub item_id: Uuid,
    /// Requested urgency
    pub urgency: RecoveryUrgency,
    /// Current status
    pub status: RecoveryStatus,
    /// Why the takedown was requested
    pub reason: String,
    /// Who triggered the request
    pub triggered_by: String,
    /// Platform post id at the time of the request
    pub external_id: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// When the record reached a terminal status
    pub completed_at: Option<DateTime<Utc>>,
}

impl RecoveryRecord {
    /// Create a pending recovery request.
    pub fn new(
        item_id: Uuid,
        urgency: RecoveryUrgency,
        reason: impl Into<String>,
        triggered_by: impl Into<String>,
        external_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            urgency,
            status: RecoveryStatus::Pending,
            reason: reason.into(),
            triggered_by: triggered_by.into(),
            external_id,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Mark the takedown as in progress.
    pub fn begin_execution(&mut self) {
        self.status = RecoveryStatus::Executing;
    }

    /// Move the record to a terminal status.
    pub fn finish(&mut self, status: RecoveryStatus) {
        debug_assert!(status.is_terminal());
        self.status = status;
        self.completed_at = Some(Utc::now());
    }
}
