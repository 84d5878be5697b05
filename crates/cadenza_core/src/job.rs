//! Publish jobs: one scheduled attempt per (item, platform).

use crate::{Platform, PublishReceipt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a publish job.
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
pub enum JobStatus {
    /// Waiting for its scheduled time
    Queued,
    /// A dispatch is in flight
    Publishing,
    /// The post is live; terminal
    Published,
    /// The job gave up or was cancelled; terminal
    Failed,
    /// Held by the global publish gate
    Paused,
}

impl JobStatus {
    /// Whether no further transitions are allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Published | Self::Failed)
    }

    /// Whether the job still occupies its (item, platform) slot.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

/// One scheduled attempt to publish a content item to one platform.
///
/// At most one active (non-terminal) job exists per (item, platform);
/// rescheduling replaces the prior job rather than duplicating it.
/// Created by the scheduler, mutated by the executor, terminal on
/// [`JobStatus::Published`] or [`JobStatus::Failed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishJob {
    /// Unique job id
    pub id: Uuid,
    /// The content item being published
    pub item_id: Uuid,
    /// Owning client account, denormalized for cadence queries
    pub account_id: Uuid,
    /// Target platform
    pub platform: Platform,
    /// Wall-clock time the job should fire
    pub scheduled_at: DateTime<Utc>,
    /// Current job status
    pub status: JobStatus,
    /// Consecutive dispatch failures so far (0..=3)
    pub retry_count: u32,
    /// Most recent dispatch error, if any
    pub last_error: Option<String>,
    /// Platform-assigned post id, set on success
    pub external_id: Option<String>,
    /// Platform-assigned post URL, set on success
    pub external_url: Option<String>,
    /// When the post went live
    pub published_at: Option<DateTime<Utc>>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last mutation time
    pub updated_at: DateTime<Utc>,
}

impl PublishJob {
    /// Create a queued job for an (item, platform) at a scheduled time.
    pub fn new(
        item_id: Uuid,
        account_id: Uuid,
        platform: Platform,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            item_id,
            account_id,
            platform,
            scheduled_at,
            status: JobStatus::Queued,
            retry_count: 0,
            last_error: None,
            external_id: None,
            external_url: None,
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the dispatch as in flight.
    pub fn mark_publishing(&mut self) {
        self.status = JobStatus::Publishing;
        self.touch();
    }

    /// Record a successful publish.
    pub fn mark_published(&mut self, receipt: &PublishReceipt, at: DateTime<Utc>) {
        self.status = JobStatus::Published;
        self.external_id = Some(receipt.external_id.clone());
        self.external_url = Some(receipt.url.clone());
        self.published_at = Some(at);
        self.touch();
    }

    /// Terminally fail the job.
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.last_error = Some(reason.into());
        self.touch();
    }

    /// Hold the job under the global publish gate.
    pub fn mark_paused(&mut self) {
        self.status = JobStatus::Paused;
        self.touch();
    }

    /// Count a dispatch failure.
    pub fn record_retry(&mut self, reason: impl Into<String>) {
        self.retry_count += 1;
        self.last_error = Some(reason.into());
        self.touch();
    }

    /// Return the job to the queue for a later attempt.
    pub fn requeue_at(&mut self, at: DateTime<Utc>) {
        self.status = JobStatus::Queued;
        self.scheduled_at = at;
        self.touch();
    }

    /// Reset an existing active job for a fresh schedule, replacing any
    /// retry bookkeeping from the superseded registration.
    pub fn reschedule(&mut self, at: DateTime<Utc>) {
        self.status = JobStatus::Queued;
        self.scheduled_at = at;
        self.retry_count = 0;
        self.last_error = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
