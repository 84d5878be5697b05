//! Cadence enforcement and deferred job registration.

use crate::executor::{ExecOutcome, JobExecutor};
use crate::JobKey;
use cadenza_core::{CadenceRules, JobStatus, Platform, PublishJob};
use cadenza_error::CadenzaResult;
use cadenza_interface::{ContentRepository, JobRepository};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

/// Whether a job constrains future cadence for its (account, platform).
///
/// Everything except terminally failed jobs counts: queued, publishing,
/// and paused jobs hold a future slot, published jobs hold a past one.
fn counts_toward_cadence(status: JobStatus) -> bool {
    status.is_active() || status == JobStatus::Published
}

/// Push `desired` forward until it satisfies the cadence rules against
/// the given set of existing jobs.
///
/// The minimum gap applies first, then the weekly cap. The cap
/// re-applies over the same snapshot until the trailing 7-day window
/// admits the job, so the effective time can move in whole-week steps
/// when the window is saturated.
pub fn apply_cadence(
    desired: DateTime<Utc>,
    rules: &CadenceRules,
    existing: &[PublishJob],
) -> DateTime<Utc> {
    let mut effective = desired;

    if let Some(gap) = rules.min_hours_between {
        if let Some(latest) = existing.iter().map(|job| job.scheduled_at).max() {
            let floor = latest + Duration::hours(gap);
            if effective < floor {
                effective = floor;
            }
        }
    }

    if let Some(cap) = rules.max_posts_per_week {
        loop {
            let window_start = effective - Duration::days(7);
            let in_window: Vec<DateTime<Utc>> = existing
                .iter()
                .map(|job| job.scheduled_at)
                .filter(|at| *at > window_start && *at <= effective)
                .collect();
            if in_window.len() < cap {
                break;
            }
            let Some(earliest) = in_window.iter().min().copied() else {
                break;
            };
            effective = earliest + Duration::days(7);
        }
    }

    effective
}

struct Registration {
    epoch: u64,
    in_flight: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

struct SchedulerInner {
    jobs: Arc<dyn JobRepository>,
    contents: Arc<dyn ContentRepository>,
    executor: Arc<JobExecutor>,
    registrations: Mutex<HashMap<JobKey, Registration>>,
    epochs: AtomicU64,
}

impl SchedulerInner {
    fn lock_registrations(&self) -> MutexGuard<'_, HashMap<JobKey, Registration>> {
        match self.registrations.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn is_current(&self, key: JobKey, epoch: u64) -> bool {
        self.lock_registrations()
            .get(&key)
            .is_some_and(|reg| reg.epoch == epoch)
    }

    fn clear(&self, key: JobKey, epoch: u64) {
        let mut regs = self.lock_registrations();
        if regs.get(&key).is_some_and(|reg| reg.epoch == epoch) {
            regs.remove(&key);
        }
    }

    /// Register a timer for `key`, replacing any prior registration.
    ///
    /// The replaced timer is aborted unless its dispatch is already in
    /// flight; an in-flight run completes, applies its result, and then
    /// observes it is no longer current.
    fn register(inner: &Arc<Self>, key: JobKey, at: DateTime<Utc>) {
        let epoch = inner.epochs.fetch_add(1, Ordering::Relaxed) + 1;
        let in_flight = Arc::new(AtomicBool::new(false));

        // The lock is held across spawn + insert so the new task cannot
        // observe the map before its own registration lands.
        let mut regs = inner.lock_registrations();

        let task_inner = Arc::clone(inner);
        let task_flag = Arc::clone(&in_flight);
        let handle = tokio::spawn(async move {
            let delay = (at - Utc::now()).to_std().unwrap_or_default();
            tokio::time::sleep(delay).await;
            Self::fire(task_inner, key, epoch, task_flag).await;
        });

        if let Some(prev) = regs.insert(
            key,
            Registration {
                epoch,
                in_flight,
                handle,
            },
        ) {
            debug!(key = %key, "Replacing existing registration");
            if !prev.in_flight.load(Ordering::Acquire) {
                prev.handle.abort();
            }
        }
    }

    async fn fire(inner: Arc<Self>, key: JobKey, epoch: u64, in_flight: Arc<AtomicBool>) {
        loop {
            if !inner.is_current(key, epoch) {
                return;
            }
            in_flight.store(true, Ordering::Release);
            let outcome = inner.executor.run(key).await;
            in_flight.store(false, Ordering::Release);

            match outcome {
                Ok(ExecOutcome::RetryAfter(delay)) => {
                    if !inner.is_current(key, epoch) {
                        return;
                    }
                    tokio::time::sleep(delay).await;
                }
                Ok(_) => {
                    inner.clear(key, epoch);
                    return;
                }
                Err(e) => {
                    error!(key = %key, error = %e, "Executor run failed, dropping registration");
                    inner.clear(key, epoch);
                    return;
                }
            }
        }
    }
}

/// Converts approval decisions into time-boxed publish jobs.
///
/// Registrations are keyed by (item, platform): registering again with
/// the same key replaces the prior registration and resets the prior
/// active job row, so rescheduling never duplicates jobs.
#[derive(Clone)]
pub struct PublishScheduler {
    inner: Arc<SchedulerInner>,
}

impl PublishScheduler {
    /// Create a scheduler over the given repositories and executor.
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        contents: Arc<dyn ContentRepository>,
        executor: Arc<JobExecutor>,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                jobs,
                contents,
                executor,
                registrations: Mutex::new(HashMap::new()),
                epochs: AtomicU64::new(0),
            }),
        }
    }

    /// Schedule an item for publishing at `desired_at`, adjusted by the
    /// cadence rules when supplied.
    ///
    /// Cadence considers other jobs for the same (account, platform)
    /// that are active or published; jobs belonging to the item being
    /// scheduled are excluded so a reschedule does not gap against
    /// itself.
    #[instrument(skip(self, rules), fields(item_id = %item_id, platform = %platform, desired_at = %desired_at))]
    pub async fn schedule(
        &self,
        item_id: uuid::Uuid,
        platform: Platform,
        desired_at: DateTime<Utc>,
        rules: Option<&CadenceRules>,
    ) -> CadenzaResult<PublishJob> {
        let item = self.inner.contents.get(item_id).await?;

        let effective = match rules {
            Some(rules) => {
                let existing: Vec<PublishJob> = self
                    .inner
                    .jobs
                    .for_account(item.account_id, platform)
                    .await?
                    .into_iter()
                    .filter(|job| job.item_id != item_id && counts_toward_cadence(job.status))
                    .collect();
                apply_cadence(desired_at, rules, &existing)
            }
            None => desired_at,
        };

        let job = match self.inner.jobs.active_for(item_id, platform).await? {
            Some(mut existing) => {
                existing.reschedule(effective);
                self.inner.jobs.update(existing.clone()).await?;
                existing
            }
            None => {
                let job = PublishJob::new(item_id, item.account_id, platform, effective);
                self.inner.jobs.insert(job.clone()).await?;
                job
            }
        };

        SchedulerInner::register(&self.inner, JobKey::new(item_id, platform), effective);
        info!(scheduled_at = %effective, job_id = %job.id, "Publish job scheduled");
        Ok(job)
    }

    /// Cancel the registration for (item, platform), failing any queued
    /// job with reason "cancelled by operator".
    ///
    /// Only not-yet-fired registrations are affected: an in-flight
    /// dispatch runs to completion and its result is still applied.
    /// Returns whether a registration existed.
    #[instrument(skip(self), fields(item_id = %item_id, platform = %platform))]
    pub async fn cancel(&self, item_id: uuid::Uuid, platform: Platform) -> CadenzaResult<bool> {
        let key = JobKey::new(item_id, platform);
        let existed = self.unregister(key);

        if let Some(mut job) = self.inner.jobs.active_for(item_id, platform).await? {
            if job.status == JobStatus::Queued {
                job.mark_failed("cancelled by operator");
                self.inner.jobs.update(job).await?;
            }
        }

        info!(existed, "Registration cancelled");
        Ok(existed)
    }

    /// Number of live registrations.
    pub fn registered_len(&self) -> usize {
        self.inner.lock_registrations().len()
    }

    /// Whether a registration exists for the key.
    pub fn is_registered(&self, key: JobKey) -> bool {
        self.inner.lock_registrations().contains_key(&key)
    }

    /// Register a timer without touching job rows. Used by the gate when
    /// re-queueing paused jobs.
    pub(crate) fn register_at(&self, key: JobKey, at: DateTime<Utc>) {
        SchedulerInner::register(&self.inner, key, at);
    }

    /// Drop a registration without failing the job row. The timer is
    /// aborted unless its dispatch is in flight. Returns whether a
    /// registration existed.
    pub(crate) fn unregister(&self, key: JobKey) -> bool {
        let mut regs = self.inner.lock_registrations();
        match regs.remove(&key) {
            Some(reg) => {
                if !reg.in_flight.load(Ordering::Acquire) {
                    reg.handle.abort();
                }
                true
            }
            None => false,
        }
    }
}
