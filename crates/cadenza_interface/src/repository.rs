//! Persistence traits.
//!
//! Durable storage is an external collaborator: these traits specify the
//! read-modify-write surface the pipeline needs per row. The in-memory
//! reference backend lives in `cadenza_store`; a database-backed
//! implementation plugs in behind the same traits.

use async_trait::async_trait;
use cadenza_core::{
    AuditEvent, ContentItem, JobStatus, PauseState, Platform, PublishJob, RecoveryRecord,
};
use cadenza_error::CadenzaResult;
use uuid::Uuid;

/// Storage for content items.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Insert a new item.
    async fn insert(&self, item: ContentItem) -> CadenzaResult<()>;

    /// Fetch an item by id.
    async fn get(&self, id: Uuid) -> CadenzaResult<ContentItem>;

    /// Persist a mutated item.
    async fn update(&self, item: ContentItem) -> CadenzaResult<()>;
}

/// Storage for publish jobs.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert a new job.
    async fn insert(&self, job: PublishJob) -> CadenzaResult<()>;

    /// Fetch a job by id.
    async fn get(&self, id: Uuid) -> CadenzaResult<PublishJob>;

    /// Persist a mutated job.
    async fn update(&self, job: PublishJob) -> CadenzaResult<()>;

    /// The active (non-terminal) job for an (item, platform), if any.
    async fn active_for(
        &self,
        item_id: Uuid,
        platform: Platform,
    ) -> CadenzaResult<Option<PublishJob>>;

    /// All jobs for an (account, platform), any status.
    async fn for_account(&self, account_id: Uuid, platform: Platform)
        -> CadenzaResult<Vec<PublishJob>>;

    /// All jobs currently in the given status.
    async fn with_status(&self, status: JobStatus) -> CadenzaResult<Vec<PublishJob>>;
}

/// Storage for recovery records.
#[async_trait]
pub trait RecoveryRepository: Send + Sync {
    /// Insert a new record.
    async fn insert(&self, record: RecoveryRecord) -> CadenzaResult<()>;

    /// Fetch a record by id.
    async fn get(&self, id: Uuid) -> CadenzaResult<RecoveryRecord>;

    /// Persist a mutated record.
    async fn update(&self, record: RecoveryRecord) -> CadenzaResult<()>;

    /// All records for an item, oldest first.
    async fn for_item(&self, item_id: Uuid) -> CadenzaResult<Vec<RecoveryRecord>>;
}

/// Append-only audit trail.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Append one event.
    async fn append(&self, event: AuditEvent) -> CadenzaResult<()>;

    /// All events recorded for an item, oldest first.
    async fn events_for(&self, item_id: Uuid) -> CadenzaResult<Vec<AuditEvent>>;
}

/// Storage for the singleton pause state.
#[async_trait]
pub trait PauseStateStore: Send + Sync {
    /// Read the current state.
    async fn get(&self) -> CadenzaResult<PauseState>;

    /// Replace the state.
    async fn set(&self, state: PauseState) -> CadenzaResult<()>;
}
