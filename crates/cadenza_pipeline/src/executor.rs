//! The executor that runs a publish job at its scheduled time.

use crate::JobKey;
use cadenza_core::{
    ContentItem, ContentStatus, JobStatus, NotificationEvent, PublishJob, PublishPayload,
    PublishReceipt,
};
use cadenza_error::{CadenzaResult, PublishError, PublishErrorKind};
use cadenza_interface::{
    ContentRepository, JobRepository, NotificationSink, PauseStateStore, Publisher,
};
use cadenza_lifecycle::LifecycleMachine;
use cadenza_rate_limit::{CadenzaConfig, PublishWindow};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Actor name recorded on audit events written by the executor.
const EXECUTOR_ACTOR: &str = "publish-executor";

/// Delay before the nth retry: 2^n minutes (2, 4, then 8).
pub fn backoff_delay(retry: u32) -> Duration {
    Duration::from_secs(60 * (2u64 << retry.saturating_sub(1)))
}

/// Dispatch and retry settings, usually read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishSettings {
    /// Bound on one dispatch to the platform publisher
    pub dispatch_timeout: Duration,
    /// Consecutive dispatch failures before a job terminally fails
    pub max_retries: u32,
    /// Delay before a rate-limited job is re-checked
    pub rate_limit_requeue: Duration,
}

impl PublishSettings {
    /// Build settings from the `[publish]` configuration section.
    pub fn from_config(config: &CadenzaConfig) -> Self {
        Self {
            dispatch_timeout: Duration::from_secs(config.publish.dispatch_timeout_secs),
            max_retries: config.publish.max_retries,
            rate_limit_requeue: Duration::from_secs(config.publish.rate_limit_requeue_secs),
        }
    }
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            dispatch_timeout: Duration::from_secs(30),
            max_retries: 3,
            rate_limit_requeue: Duration::from_secs(60),
        }
    }
}

/// Outcome of one executor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    /// The post is live and the item transitioned to `published`
    Published,
    /// The job terminally failed
    Failed,
    /// The global gate held the job
    Paused,
    /// No runnable job for the key; nothing was done
    Skipped,
    /// The job stays queued and should fire again after the delay
    RetryAfter(Duration),
}

/// Runs due publish jobs against the platform publisher.
///
/// One run owns its job row exclusively: the scheduler registration is
/// the single trigger point, so no two runs process the same
/// (item, platform) concurrently. The pause gate is read fresh at
/// dispatch time, never cached from schedule time.
pub struct JobExecutor {
    jobs: Arc<dyn JobRepository>,
    contents: Arc<dyn ContentRepository>,
    lifecycle: LifecycleMachine,
    publisher: Arc<dyn Publisher>,
    notifier: Arc<dyn NotificationSink>,
    window: Arc<PublishWindow>,
    pause: Arc<dyn PauseStateStore>,
    settings: PublishSettings,
}

impl JobExecutor {
    /// Create an executor over the given collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        contents: Arc<dyn ContentRepository>,
        lifecycle: LifecycleMachine,
        publisher: Arc<dyn Publisher>,
        notifier: Arc<dyn NotificationSink>,
        window: Arc<PublishWindow>,
        pause: Arc<dyn PauseStateStore>,
        settings: PublishSettings,
    ) -> Self {
        Self {
            jobs,
            contents,
            lifecycle,
            publisher,
            notifier,
            window,
            pause,
            settings,
        }
    }

    /// Run the job registered under `key`, applying its outcome.
    ///
    /// Every step short-circuits: gate check, precondition check, call
    /// budget, then the bounded dispatch itself.
    #[instrument(skip(self), fields(item_id = %key.item_id, platform = %key.platform))]
    pub async fn run(&self, key: JobKey) -> CadenzaResult<ExecOutcome> {
        let Some(mut job) = self.jobs.active_for(key.item_id, key.platform).await? else {
            debug!("No active job for key, skipping");
            return Ok(ExecOutcome::Skipped);
        };
        if job.status != JobStatus::Queued {
            debug!(status = %job.status, "Job not queued, skipping");
            return Ok(ExecOutcome::Skipped);
        }

        // Gate state is read at the moment of dispatch, never cached.
        let pause = self.pause.get().await?;
        if pause.is_paused {
            info!("Publish gate engaged, holding job");
            job.mark_paused();
            self.jobs.update(job).await?;
            return Ok(ExecOutcome::Paused);
        }

        let item = match self.contents.get(job.item_id).await {
            Ok(item) => item,
            Err(e) if e.is_not_found() => {
                return self
                    .fail_terminal(job, "content item no longer exists")
                    .await;
            }
            Err(e) => return Err(e),
        };
        let Some(media) = item.media.clone() else {
            // A job without a resolved asset is a caller bug, not a
            // transient fault: terminal immediately, never retried.
            return self
                .fail_terminal(job, "content item has no resolved media asset")
                .await;
        };

        if !self.window.can_publish(key.platform) {
            debug!("Platform call budget exhausted, leaving job queued");
            let delay = self.settings.rate_limit_requeue;
            job.requeue_at(Utc::now() + chrono::Duration::seconds(delay.as_secs() as i64));
            self.jobs.update(job).await?;
            return Ok(ExecOutcome::RetryAfter(delay));
        }

        job.mark_publishing();
        self.jobs.update(job.clone()).await?;

        let payload = PublishPayload {
            item_id: item.id,
            account_id: item.account_id,
            platform: key.platform,
            body: item.body.clone(),
            media,
        };

        // The call is spent once we commit to dispatching, whether or
        // not the dispatch comes back.
        self.window.record_call(key.platform);

        let dispatched = tokio::time::timeout(
            self.settings.dispatch_timeout,
            self.publisher.publish(key.platform, &payload),
        )
        .await
        .unwrap_or_else(|_| {
            Err(PublishError::new(PublishErrorKind::Timeout(
                self.settings.dispatch_timeout.as_secs(),
            )))
        });

        match dispatched {
            Ok(receipt) => self.complete(job, item, receipt).await,
            Err(e) => self.handle_failure(job, e).await,
        }
    }

    async fn complete(
        &self,
        mut job: PublishJob,
        mut item: ContentItem,
        receipt: PublishReceipt,
    ) -> CadenzaResult<ExecOutcome> {
        let now = Utc::now();
        job.mark_published(&receipt, now);
        self.jobs.update(job.clone()).await?;

        item.external_id = Some(receipt.external_id.clone());
        item.external_url = Some(receipt.url.clone());
        item.touch();
        self.contents.update(item).await?;

        let mut details = BTreeMap::new();
        details.insert("external_id".to_string(), receipt.external_id.clone());
        details.insert("url".to_string(), receipt.url.clone());
        if let Err(e) = self
            .lifecycle
            .transition(job.item_id, ContentStatus::Published, EXECUTOR_ACTOR, details)
            .await
        {
            // The post is live; the job row is the record of truth.
            error!(error = %e, "Post published but lifecycle transition failed");
        }

        self.notify_quietly(NotificationEvent::PublishComplete {
            item_id: job.item_id,
            platform: job.platform,
            external_id: receipt.external_id.clone(),
            url: receipt.url,
        })
        .await;

        info!(external_id = %receipt.external_id, "Publish complete");
        Ok(ExecOutcome::Published)
    }

    async fn handle_failure(
        &self,
        mut job: PublishJob,
        e: PublishError,
    ) -> CadenzaResult<ExecOutcome> {
        warn!(error = %e, retry_count = job.retry_count, "Dispatch failed");

        if !e.kind.is_retryable() {
            return self.fail_terminal(job, e.to_string()).await;
        }

        job.record_retry(e.to_string());
        if job.retry_count < self.settings.max_retries {
            let delay = backoff_delay(job.retry_count);
            job.requeue_at(Utc::now() + chrono::Duration::seconds(delay.as_secs() as i64));
            self.jobs.update(job.clone()).await?;
            info!(
                retry_count = job.retry_count,
                delay_secs = delay.as_secs(),
                "Retry scheduled"
            );
            Ok(ExecOutcome::RetryAfter(delay))
        } else {
            self.fail_terminal(job, e.to_string()).await
        }
    }

    async fn fail_terminal(
        &self,
        mut job: PublishJob,
        reason: impl Into<String>,
    ) -> CadenzaResult<ExecOutcome> {
        let reason = reason.into();
        job.mark_failed(reason.clone());
        self.jobs.update(job.clone()).await?;

        self.notify_quietly(NotificationEvent::PublishFailed {
            item_id: job.item_id,
            platform: job.platform,
            retry_count: job.retry_count,
            reason: reason.clone(),
        })
        .await;

        error!(retry_count = job.retry_count, %reason, "Publish job failed");
        Ok(ExecOutcome::Failed)
    }

    async fn notify_quietly(&self, event: NotificationEvent) {
        if let Err(e) = self.notifier.notify(event).await {
            warn!(error = %e, "Notification sink failed, continuing");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_sequence_is_two_four_eight_minutes() {
        assert_eq!(backoff_delay(1), Duration::from_secs(2 * 60));
        assert_eq!(backoff_delay(2), Duration::from_secs(4 * 60));
        assert_eq!(backoff_delay(3), Duration::from_secs(8 * 60));
    }

    #[test]
    fn settings_default_matches_bundled_config() {
        let settings = PublishSettings::default();
        assert_eq!(settings.dispatch_timeout, Duration::from_secs(30));
        assert_eq!(settings.max_retries, 3);
    }
}
