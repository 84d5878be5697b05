//! HashMap-backed implementations of the persistence traits.

use async_trait::async_trait;
use cadenza_core::{
    AuditEvent, ContentItem, JobStatus, PauseState, Platform, PublishJob, RecoveryRecord,
};
use cadenza_error::{CadenzaResult, StoreError, StoreErrorKind};
use cadenza_interface::{
    AuditLog, ContentRepository, JobRepository, PauseStateStore, RecoveryRepository,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct MemoryStoreInner {
    contents: RwLock<HashMap<Uuid, ContentItem>>,
    jobs: RwLock<HashMap<Uuid, PublishJob>>,
    records: RwLock<HashMap<Uuid, RecoveryRecord>>,
    audit: RwLock<Vec<AuditEvent>>,
    pause: RwLock<PauseState>,
}

/// In-memory store implementing every persistence trait.
///
/// Cloning is cheap: clones share the same underlying state, so one
/// store can be handed to the scheduler, executor, gate, and recovery
/// coordinator at once.
///
/// # Examples
///
/// ```
/// use cadenza_core::{ContentItem, Platform};
/// use cadenza_interface::ContentRepository;
/// use cadenza_store::MemoryStore;
/// use uuid::Uuid;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> cadenza_error::CadenzaResult<()> {
/// let store = MemoryStore::new();
/// let item = ContentItem::new(Uuid::new_v4(), Platform::Mastodon, "hello");
/// let id = item.id;
/// store.insert(item).await?;
/// assert_eq!(store.get(id).await?.body, "hello");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

impl MemoryStore {
    /// Create an empty store with a default (unpaused) gate state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given initial pause state.
    pub fn with_pause_state(state: PauseState) -> Self {
        Self {
            inner: Arc::new(MemoryStoreInner {
                pause: RwLock::new(state),
                ..Default::default()
            }),
        }
    }
}

#[async_trait]
impl ContentRepository for MemoryStore {
    async fn insert(&self, item: ContentItem) -> CadenzaResult<()> {
        let mut contents = self.inner.contents.write().await;
        if contents.contains_key(&item.id) {
            return Err(StoreError::new(StoreErrorKind::Conflict(format!(
                "content {}",
                item.id
            ))))?;
        }
        contents.insert(item.id, item);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> CadenzaResult<ContentItem> {
        self.inner
            .contents
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::new(StoreErrorKind::NotFound(format!("content {id}"))).into())
    }

    async fn update(&self, item: ContentItem) -> CadenzaResult<()> {
        let mut contents = self.inner.contents.write().await;
        if !contents.contains_key(&item.id) {
            return Err(StoreError::new(StoreErrorKind::NotFound(format!(
                "content {}",
                item.id
            ))))?;
        }
        contents.insert(item.id, item);
        Ok(())
    }
}

#[async_trait]
impl JobRepository for MemoryStore {
    async fn insert(&self, job: PublishJob) -> CadenzaResult<()> {
        let mut jobs = self.inner.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(StoreError::new(StoreErrorKind::Conflict(format!(
                "job {}",
                job.id
            ))))?;
        }
        jobs.insert(job.id, job);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> CadenzaResult<PublishJob> {
        self.inner
            .jobs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::new(StoreErrorKind::NotFound(format!("job {id}"))).into())
    }

    async fn update(&self, job: PublishJob) -> CadenzaResult<()> {
        let mut jobs = self.inner.jobs.write().await;
        if !jobs.contains_key(&job.id) {
            return Err(StoreError::new(StoreErrorKind::NotFound(format!(
                "job {}",
                job.id
            ))))?;
        }
        jobs.insert(job.id, job);
        Ok(())
    }

    async fn active_for(
        &self,
        item_id: Uuid,
        platform: Platform,
    ) -> CadenzaResult<Option<PublishJob>> {
        Ok(self
            .inner
            .jobs
            .read()
            .await
            .values()
            .find(|job| {
                job.item_id == item_id && job.platform == platform && job.status.is_active()
            })
            .cloned())
    }

    async fn for_account(
        &self,
        account_id: Uuid,
        platform: Platform,
    ) -> CadenzaResult<Vec<PublishJob>> {
        Ok(self
            .inner
            .jobs
            .read()
            .await
            .values()
            .filter(|job| job.account_id == account_id && job.platform == platform)
            .cloned()
            .collect())
    }

    async fn with_status(&self, status: JobStatus) -> CadenzaResult<Vec<PublishJob>> {
        Ok(self
            .inner
            .jobs
            .read()
            .await
            .values()
            .filter(|job| job.status == status)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecoveryRepository for MemoryStore {
    async fn insert(&self, record: RecoveryRecord) -> CadenzaResult<()> {
        let mut records = self.inner.records.write().await;
        if records.contains_key(&record.id) {
            return Err(StoreError::new(StoreErrorKind::Conflict(format!(
                "recovery record {}",
                record.id
            ))))?;
        }
        records.insert(record.id, record);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> CadenzaResult<RecoveryRecord> {
        self.inner
            .records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| {
                StoreError::new(StoreErrorKind::NotFound(format!("recovery record {id}"))).into()
            })
    }

    async fn update(&self, record: RecoveryRecord) -> CadenzaResult<()> {
        let mut records = self.inner.records.write().await;
        if !records.contains_key(&record.id) {
            return Err(StoreError::new(StoreErrorKind::NotFound(format!(
                "recovery record {}",
                record.id
            ))))?;
        }
        records.insert(record.id, record);
        Ok(())
    }

    async fn for_item(&self, item_id: Uuid) -> CadenzaResult<Vec<RecoveryRecord>> {
        let mut records: Vec<RecoveryRecord> = self
            .inner
            .records
            .read()
            .await
            .values()
            .filter(|record| record.item_id == item_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }
}

#[async_trait]
impl AuditLog for MemoryStore {
    async fn append(&self, event: AuditEvent) -> CadenzaResult<()> {
        self.inner.audit.write().await.push(event);
        Ok(())
    }

    async fn events_for(&self, item_id: Uuid) -> CadenzaResult<Vec<AuditEvent>> {
        Ok(self
            .inner
            .audit
            .read()
            .await
            .iter()
            .filter(|event| event.item_id == item_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PauseStateStore for MemoryStore {
    async fn get(&self) -> CadenzaResult<PauseState> {
        Ok(self.inner.pause.read().await.clone())
    }

    async fn set(&self, state: PauseState) -> CadenzaResult<()> {
        *self.inner.pause.write().await = state;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let store = MemoryStore::new();
        let job = PublishJob::new(Uuid::new_v4(), Uuid::new_v4(), Platform::Bluesky, Utc::now());
        assert!(JobRepository::update(&store, job).await.is_err());
    }

    #[tokio::test]
    async fn double_insert_is_a_conflict() {
        let store = MemoryStore::new();
        let item = ContentItem::new(Uuid::new_v4(), Platform::Discord, "hi");
        ContentRepository::insert(&store, item.clone()).await.unwrap();
        assert!(ContentRepository::insert(&store, item).await.is_err());
    }

    #[tokio::test]
    async fn active_for_ignores_terminal_jobs() {
        let store = MemoryStore::new();
        let item_id = Uuid::new_v4();
        let mut done = PublishJob::new(item_id, Uuid::new_v4(), Platform::Mastodon, Utc::now());
        done.mark_failed("gone");
        JobRepository::insert(&store, done).await.unwrap();
        assert!(
            store
                .active_for(item_id, Platform::Mastodon)
                .await
                .unwrap()
                .is_none()
        );

        let live = PublishJob::new(item_id, Uuid::new_v4(), Platform::Mastodon, Utc::now());
        JobRepository::insert(&store, live.clone()).await.unwrap();
        let found = store
            .active_for(item_id, Platform::Mastodon)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, live.id);
    }

    #[tokio::test]
    async fn pause_state_round_trips() {
        let store = MemoryStore::new();
        let mut state = PauseStateStore::get(&store).await.unwrap();
        assert!(!state.is_paused);
        state.pause("operator");
        PauseStateStore::set(&store, state).await.unwrap();
        assert!(PauseStateStore::get(&store).await.unwrap().is_paused);
    }
}
