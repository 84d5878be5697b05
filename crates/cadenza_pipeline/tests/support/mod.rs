//! Shared doubles and wiring for pipeline integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use cadenza_core::{
    ContentItem, ContentStatus, MediaRef, NotificationEvent, PauseState, Platform, PublishPayload,
    PublishReceipt,
};
use cadenza_error::{CadenzaResult, PublishError, StoreError, StoreErrorKind};
use cadenza_interface::{
    AuditLog, ContentRepository, JobRepository, NotificationSink, PauseStateStore, Publisher,
    RecoveryRepository,
};
use cadenza_lifecycle::LifecycleMachine;
use cadenza_pipeline::{
    JobExecutor, PublishGate, PublishScheduler, PublishSettings, RecoveryCoordinator,
};
use cadenza_rate_limit::PublishWindow;
use cadenza_store::MemoryStore;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Scripted publisher double.
///
/// Publish and delete outcomes are consumed front-to-back; when the
/// script runs dry the publisher succeeds with a generated receipt.
#[derive(Default)]
pub struct MockPublisher {
    publish_script: Mutex<VecDeque<Result<PublishReceipt, PublishError>>>,
    delete_script: Mutex<VecDeque<Result<bool, PublishError>>>,
    publish_calls: AtomicUsize,
    delete_calls: Mutex<Vec<String>>,
    supports_delete: bool,
    publish_delay: Mutex<Option<Duration>>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self {
            supports_delete: true,
            ..Default::default()
        }
    }

    pub fn without_delete_support() -> Self {
        Self::default()
    }

    pub fn script_publish(&self, result: Result<PublishReceipt, PublishError>) {
        self.publish_script.lock().unwrap().push_back(result);
    }

    pub fn script_delete(&self, result: Result<bool, PublishError>) {
        self.delete_script.lock().unwrap().push_back(result);
    }

    pub fn set_publish_delay(&self, delay: Duration) {
        *self.publish_delay.lock().unwrap() = Some(delay);
    }

    pub fn publish_calls(&self) -> usize {
        self.publish_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn publish(
        &self,
        _platform: Platform,
        _payload: &PublishPayload,
    ) -> Result<PublishReceipt, PublishError> {
        let delay = *self.publish_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let n = self.publish_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let scripted = self.publish_script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(PublishReceipt::new(
                format!("post-{n}"),
                format!("https://posts.example/{n}"),
            ))
        })
    }

    fn supports_delete(&self, _platform: Platform) -> bool {
        self.supports_delete
    }

    async fn delete(&self, _platform: Platform, external_id: &str) -> Result<bool, PublishError> {
        self.delete_calls.lock().unwrap().push(external_id.to_string());
        let scripted = self.delete_script.lock().unwrap().pop_front();
        scripted.unwrap_or(Ok(true))
    }
}

/// Sink double that records every event it receives.
#[derive(Default)]
pub struct CapturingSink {
    events: Mutex<Vec<NotificationEvent>>,
}

impl CapturingSink {
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count_named(&self, name: &str) -> usize {
        self.events()
            .iter()
            .filter(|event| event.name() == name)
            .count()
    }
}

#[async_trait]
impl NotificationSink for CapturingSink {
    async fn notify(&self, event: NotificationEvent) -> CadenzaResult<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// Sink double whose channel is always down.
pub struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    async fn notify(&self, _event: NotificationEvent) -> CadenzaResult<()> {
        Err(StoreError::new(StoreErrorKind::Unavailable(
            "notification channel down".to_string(),
        )))?
    }
}

/// Fully wired pipeline over the memory store and scripted doubles.
pub struct Fixture {
    pub store: MemoryStore,
    pub publisher: Arc<MockPublisher>,
    pub sink: Arc<CapturingSink>,
    pub lifecycle: LifecycleMachine,
    pub executor: Arc<JobExecutor>,
    pub scheduler: PublishScheduler,
    pub gate: PublishGate,
    pub recovery: RecoveryCoordinator,
}

pub struct FixtureOptions {
    pub settings: PublishSettings,
    pub window: PublishWindow,
    pub pause: PauseState,
    pub publisher: MockPublisher,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        Self {
            settings: PublishSettings::default(),
            window: PublishWindow::new(3600, 1000),
            pause: PauseState::default(),
            publisher: MockPublisher::new(),
        }
    }
}

pub fn fixture() -> Fixture {
    fixture_with(FixtureOptions::default())
}

pub fn fixture_with(options: FixtureOptions) -> Fixture {
    let store = MemoryStore::with_pause_state(options.pause);
    let publisher = Arc::new(options.publisher);
    let sink = Arc::new(CapturingSink::default());

    let contents: Arc<dyn ContentRepository> = Arc::new(store.clone());
    let jobs: Arc<dyn JobRepository> = Arc::new(store.clone());
    let records: Arc<dyn RecoveryRepository> = Arc::new(store.clone());
    let audit: Arc<dyn AuditLog> = Arc::new(store.clone());
    let pause: Arc<dyn PauseStateStore> = Arc::new(store.clone());

    let lifecycle = LifecycleMachine::new(Arc::clone(&contents), audit);
    let executor = Arc::new(JobExecutor::new(
        Arc::clone(&jobs),
        Arc::clone(&contents),
        lifecycle.clone(),
        publisher.clone() as Arc<dyn Publisher>,
        sink.clone() as Arc<dyn NotificationSink>,
        Arc::new(options.window),
        Arc::clone(&pause),
        options.settings,
    ));
    let scheduler = PublishScheduler::new(
        Arc::clone(&jobs),
        Arc::clone(&contents),
        Arc::clone(&executor),
    );
    let gate = PublishGate::new(Arc::clone(&pause), Arc::clone(&jobs), scheduler.clone());
    let recovery = RecoveryCoordinator::new(
        contents,
        records,
        lifecycle.clone(),
        publisher.clone() as Arc<dyn Publisher>,
        sink.clone() as Arc<dyn NotificationSink>,
    );

    Fixture {
        store,
        publisher,
        sink,
        lifecycle,
        executor,
        scheduler,
        gate,
        recovery,
    }
}

impl Fixture {
    /// An executor over the same stores and publisher but a custom sink.
    pub fn executor_with_sink(&self, sink: Arc<dyn NotificationSink>) -> JobExecutor {
        JobExecutor::new(
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            self.lifecycle.clone(),
            self.publisher.clone() as Arc<dyn Publisher>,
            sink,
            Arc::new(PublishWindow::new(3600, 1000)),
            Arc::new(self.store.clone()),
            PublishSettings::default(),
        )
    }
}

/// Insert an approved item carrying a resolved media asset.
pub async fn approved_item(store: &MemoryStore, platform: Platform) -> ContentItem {
    let mut item = ContentItem::new(Uuid::new_v4(), platform, "scheduled post")
        .with_media(MediaRef::new("https://cdn.example/a.png", "image/png"));
    item.status = ContentStatus::Approved;
    ContentRepository::insert(store, item.clone()).await.unwrap();
    item
}

/// Insert a published item with an external post id.
pub async fn published_item(
    store: &MemoryStore,
    platform: Platform,
    external_id: Option<&str>,
) -> ContentItem {
    let mut item = ContentItem::new(Uuid::new_v4(), platform, "live post")
        .with_media(MediaRef::new("https://cdn.example/b.png", "image/png"));
    item.status = ContentStatus::Published;
    item.external_id = external_id.map(str::to_string);
    item.external_url = external_id.map(|id| format!("https://posts.example/{id}"));
    ContentRepository::insert(store, item.clone()).await.unwrap();
    item
}
