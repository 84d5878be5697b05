//! Global publish gate: pause, resume, and two-step confirmation.

mod support;

use cadenza_core::{ContentStatus, JobStatus, PauseState, Platform, PublishJob};
use cadenza_interface::{ContentRepository, JobRepository, PauseStateStore};
use cadenza_pipeline::{JobKey, ResumeOutcome};
use chrono::{Duration, Utc};
use support::*;

#[tokio::test]
async fn pause_holds_queued_jobs_and_blocks_dispatch() {
    let f = fixture();
    let item = approved_item(&f.store, Platform::Mastodon).await;
    f.scheduler
        .schedule(item.id, Platform::Mastodon, Utc::now() + Duration::hours(1), None)
        .await
        .unwrap();

    let held = f.gate.pause("ops").await.unwrap();
    assert_eq!(held, 1);
    assert!(PauseStateStore::get(&f.store).await.unwrap().is_paused);
    assert!(!f.scheduler.is_registered(JobKey::new(item.id, Platform::Mastodon)));

    let job = f
        .store
        .with_status(JobStatus::Paused)
        .await
        .unwrap()
        .pop()
        .unwrap();
    assert_eq!(job.item_id, item.id);

    // A job scheduled while paused still never dispatches: the executor
    // reads the gate fresh at fire time.
    let late = approved_item(&f.store, Platform::Mastodon).await;
    f.scheduler
        .schedule(late.id, Platform::Mastodon, Utc::now(), None)
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    assert_eq!(f.publisher.publish_calls(), 0);
    let late_job = f
        .store
        .active_for(late.id, Platform::Mastodon)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(late_job.status, JobStatus::Paused);
}

#[tokio::test]
async fn pause_is_idempotent() {
    let f = fixture();
    assert_eq!(f.gate.pause("ops").await.unwrap(), 0);
    assert_eq!(f.gate.pause("ops-again").await.unwrap(), 0);
}

#[tokio::test]
async fn resume_requeues_future_jobs() {
    let f = fixture();
    let item = approved_item(&f.store, Platform::Bluesky).await;
    let job = f
        .scheduler
        .schedule(item.id, Platform::Bluesky, Utc::now() + Duration::hours(2), None)
        .await
        .unwrap();

    f.gate.pause("ops").await.unwrap();
    let outcome = f.gate.resume("ops").await.unwrap();
    let ResumeOutcome::Resumed { requeued } = outcome else {
        panic!("confirmation should not be required");
    };
    assert_eq!(requeued, 1);

    assert!(!PauseStateStore::get(&f.store).await.unwrap().is_paused);
    assert!(f.scheduler.is_registered(JobKey::new(item.id, Platform::Bluesky)));

    let stored = JobRepository::get(&f.store, job.id).await.unwrap();
    assert_eq!(stored.status, JobStatus::Queued);
    assert_eq!(stored.scheduled_at, job.scheduled_at);
}

#[tokio::test]
async fn resume_of_an_unpaused_gate_is_a_no_op() {
    let f = fixture();
    let outcome = f.gate.resume("ops").await.unwrap();
    assert!(matches!(outcome, ResumeOutcome::Resumed { requeued: 0 }));
}

#[tokio::test]
async fn confirmation_policy_requires_the_second_step() {
    let f = fixture_with(FixtureOptions {
        pause: PauseState::new(true),
        ..Default::default()
    });
    let item = approved_item(&f.store, Platform::Discord).await;
    f.scheduler
        .schedule(item.id, Platform::Discord, Utc::now() + Duration::hours(1), None)
        .await
        .unwrap();

    f.gate.pause("ops").await.unwrap();

    let outcome = f.gate.resume("ops").await.unwrap();
    let ResumeOutcome::ConfirmationRequired(ticket) = outcome else {
        panic!("policy requires confirmation");
    };

    // Still paused until confirmed.
    assert!(PauseStateStore::get(&f.store).await.unwrap().is_paused);
    assert_eq!(f.gate.pending_tickets().len(), 1);

    let requeued = f.gate.confirm_resume(*ticket.id(), "ops-lead").await.unwrap();
    assert_eq!(requeued, 1);
    assert!(!PauseStateStore::get(&f.store).await.unwrap().is_paused);
    assert!(f.gate.pending_tickets().is_empty());
}

#[tokio::test]
async fn confirming_an_unknown_ticket_fails() {
    let f = fixture();
    let err = f
        .gate
        .confirm_resume(uuid::Uuid::new_v4(), "ops")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn overdue_paused_jobs_reattempt_immediately_on_resume() {
    let f = fixture();
    let item = approved_item(&f.store, Platform::Tumblr).await;

    // A job whose scheduled time passed while the gate was engaged.
    let mut job = PublishJob::new(
        item.id,
        item.account_id,
        Platform::Tumblr,
        Utc::now() - Duration::hours(1),
    );
    job.mark_paused();
    JobRepository::insert(&f.store, job.clone()).await.unwrap();

    let mut state = PauseStateStore::get(&f.store).await.unwrap();
    state.pause("ops");
    PauseStateStore::set(&f.store, state).await.unwrap();

    f.gate.resume("ops").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    let item = ContentRepository::get(&f.store, item.id).await.unwrap();
    assert_eq!(item.status, ContentStatus::Published);
    assert_eq!(f.publisher.publish_calls(), 1);
}
