//! Integration tests for the lifecycle machine over the memory store.

use cadenza_core::{ContentItem, ContentStatus, Platform};
use cadenza_error::CadenzaErrorKind;
use cadenza_interface::{AuditLog, ContentRepository};
use cadenza_lifecycle::LifecycleMachine;
use cadenza_store::MemoryStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

fn machine(store: &MemoryStore) -> LifecycleMachine {
    LifecycleMachine::new(
        Arc::new(store.clone()) as Arc<dyn ContentRepository>,
        Arc::new(store.clone()) as Arc<dyn AuditLog>,
    )
}

async fn seeded_item(store: &MemoryStore) -> ContentItem {
    let item = ContentItem::new(Uuid::new_v4(), Platform::Mastodon, "draft text");
    store.insert(item.clone()).await.unwrap();
    item
}

#[tokio::test]
async fn valid_transition_mutates_and_audits() {
    let store = MemoryStore::new();
    let machine = machine(&store);
    let item = seeded_item(&store).await;

    let mut details = BTreeMap::new();
    details.insert("note".to_string(), "ready for review".to_string());
    let updated = machine
        .transition(item.id, ContentStatus::InReview, "writer", details)
        .await
        .unwrap();

    assert_eq!(updated.status, ContentStatus::InReview);
    assert_eq!(store.get(item.id).await.unwrap().status, ContentStatus::InReview);

    let events = store.events_for(item.id).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].old_status, ContentStatus::Draft);
    assert_eq!(events[0].new_status, ContentStatus::InReview);
    assert_eq!(events[0].actor, "writer");
    assert_eq!(events[0].details.get("note").unwrap(), "ready for review");
}

#[tokio::test]
async fn invalid_transition_leaves_item_unchanged() {
    let store = MemoryStore::new();
    let machine = machine(&store);
    let item = seeded_item(&store).await;

    let err = machine
        .transition(item.id, ContentStatus::Published, "writer", BTreeMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), CadenzaErrorKind::Lifecycle(_)));
    assert!(err.to_string().contains("Invalid transition"));
    assert_eq!(store.get(item.id).await.unwrap().status, ContentStatus::Draft);
    assert!(store.events_for(item.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_item_is_not_found() {
    let store = MemoryStore::new();
    let machine = machine(&store);

    let err = machine
        .transition(Uuid::new_v4(), ContentStatus::InReview, "writer", BTreeMap::new())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn full_review_cycle_appends_one_event_per_hop() {
    let store = MemoryStore::new();
    let machine = machine(&store);
    let item = seeded_item(&store).await;

    for (status, actor) in [
        (ContentStatus::InReview, "writer"),
        (ContentStatus::Rejected, "reviewer"),
        (ContentStatus::InReview, "writer"),
        (ContentStatus::Approved, "reviewer"),
    ] {
        machine
            .transition(item.id, status, actor, BTreeMap::new())
            .await
            .unwrap();
    }

    let events = store.events_for(item.id).await.unwrap();
    assert_eq!(events.len(), 4);
    assert_eq!(store.get(item.id).await.unwrap().status, ContentStatus::Approved);
}
