//! The global publish gate: cross-cutting pause and resume.

use crate::scheduler::PublishScheduler;
use crate::JobKey;
use cadenza_core::JobStatus;
use cadenza_error::{CadenzaResult, StoreError, StoreErrorKind};
use cadenza_interface::{JobRepository, PauseStateStore};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// A pending two-step resume confirmation.
#[derive(Debug, Clone, Getters)]
pub struct ResumeTicket {
    /// Ticket id to pass to `confirm_resume`
    id: Uuid,
    /// Who requested the resume
    requested_by: String,
    /// When the resume was requested
    requested_at: DateTime<Utc>,
}

/// Result of a resume request.
#[derive(Debug, Clone)]
pub enum ResumeOutcome {
    /// The gate was cleared
    Resumed {
        /// Paused jobs handed back to the scheduler
        requeued: usize,
    },
    /// Policy requires an explicit second step; publishing stays held
    ConfirmationRequired(ResumeTicket),
}

/// The single shared pause/resume control over all pending publish jobs.
///
/// Pausing sets the flag and bulk-holds every queued job; resuming
/// clears the flag and hands every paused job back to the scheduler.
/// The executor reads the underlying state fresh at dispatch time, so a
/// pause takes effect even for timers that were registered long before.
pub struct PublishGate {
    pause: Arc<dyn PauseStateStore>,
    jobs: Arc<dyn JobRepository>,
    scheduler: PublishScheduler,
    tickets: Mutex<HashMap<Uuid, ResumeTicket>>,
}

impl PublishGate {
    /// Create a gate over the given state store, job repository, and
    /// scheduler.
    pub fn new(
        pause: Arc<dyn PauseStateStore>,
        jobs: Arc<dyn JobRepository>,
        scheduler: PublishScheduler,
    ) -> Self {
        Self {
            pause,
            jobs,
            scheduler,
            tickets: Mutex::new(HashMap::new()),
        }
    }

    /// Engage the gate, holding every queued job.
    ///
    /// Returns the number of jobs moved to `paused`. Idempotent: pausing
    /// an already-paused gate holds nothing further.
    #[instrument(skip(self), fields(by))]
    pub async fn pause(&self, by: &str) -> CadenzaResult<usize> {
        let mut state = self.pause.get().await?;
        if state.is_paused {
            return Ok(0);
        }
        state.pause(by);
        self.pause.set(state).await?;

        let queued = self.jobs.with_status(JobStatus::Queued).await?;
        let count = queued.len();
        for mut job in queued {
            self.scheduler
                .unregister(JobKey::new(job.item_id, job.platform));
            job.mark_paused();
            self.jobs.update(job).await?;
        }

        warn!(count, "Global publish gate engaged");
        Ok(count)
    }

    /// Request that the gate be cleared.
    ///
    /// When the configured policy requires confirmation, the gate stays
    /// engaged and a [`ResumeTicket`] is returned for the second step;
    /// otherwise the resume happens immediately.
    #[instrument(skip(self), fields(by))]
    pub async fn resume(&self, by: &str) -> CadenzaResult<ResumeOutcome> {
        let state = self.pause.get().await?;
        if !state.is_paused {
            return Ok(ResumeOutcome::Resumed { requeued: 0 });
        }

        if state.resume_requires_confirmation {
            let ticket = ResumeTicket {
                id: Uuid::new_v4(),
                requested_by: by.to_string(),
                requested_at: Utc::now(),
            };
            self.lock_tickets().insert(ticket.id, ticket.clone());
            info!(ticket_id = %ticket.id, "Resume requires confirmation");
            return Ok(ResumeOutcome::ConfirmationRequired(ticket));
        }

        let requeued = self.do_resume(by).await?;
        Ok(ResumeOutcome::Resumed { requeued })
    }

    /// Second step of a confirmed resume.
    ///
    /// # Errors
    ///
    /// Fails if no pending ticket matches `ticket_id`.
    #[instrument(skip(self), fields(ticket_id = %ticket_id, by))]
    pub async fn confirm_resume(&self, ticket_id: Uuid, by: &str) -> CadenzaResult<usize> {
        if self.lock_tickets().remove(&ticket_id).is_none() {
            return Err(StoreError::new(StoreErrorKind::NotFound(format!(
                "resume ticket {ticket_id}"
            ))))?;
        }
        self.do_resume(by).await
    }

    /// Resume requests awaiting confirmation.
    pub fn pending_tickets(&self) -> Vec<ResumeTicket> {
        self.lock_tickets().values().cloned().collect()
    }

    async fn do_resume(&self, by: &str) -> CadenzaResult<usize> {
        let mut state = self.pause.get().await?;
        state.resume();
        self.pause.set(state).await?;

        let paused = self.jobs.with_status(JobStatus::Paused).await?;
        let now = Utc::now();
        let count = paused.len();
        for mut job in paused {
            // Future jobs keep their slot; overdue jobs re-attempt now.
            let at = if job.scheduled_at > now {
                job.scheduled_at
            } else {
                now
            };
            job.requeue_at(at);
            self.jobs.update(job.clone()).await?;
            self.scheduler
                .register_at(JobKey::new(job.item_id, job.platform), at);
        }

        info!(by, count, "Global publish gate cleared");
        Ok(count)
    }

    fn lock_tickets(&self) -> MutexGuard<'_, HashMap<Uuid, ResumeTicket>> {
        match self.tickets.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
