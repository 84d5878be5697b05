//! Post-publish takedown: the recovery coordinator.

use cadenza_core::{ContentStatus, NotificationEvent, RecoveryRecord, RecoveryStatus, RecoveryUrgency};
use cadenza_error::{CadenzaResult, LifecycleError, LifecycleErrorKind};
use cadenza_interface::{ContentRepository, NotificationSink, Publisher, RecoveryRepository};
use cadenza_lifecycle::{allowed_transitions, LifecycleMachine};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Executes post-publish takedown requests.
///
/// Recovery archives: whatever the platform's delete capability allows,
/// the content item ends in `recovered` and is never physically deleted.
pub struct RecoveryCoordinator {
    contents: Arc<dyn ContentRepository>,
    records: Arc<dyn RecoveryRepository>,
    lifecycle: LifecycleMachine,
    publisher: Arc<dyn Publisher>,
    notifier: Arc<dyn NotificationSink>,
}

impl RecoveryCoordinator {
    /// Create a coordinator over the given collaborators.
    pub fn new(
        contents: Arc<dyn ContentRepository>,
        records: Arc<dyn RecoveryRepository>,
        lifecycle: LifecycleMachine,
        publisher: Arc<dyn Publisher>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            contents,
            records,
            lifecycle,
            publisher,
            notifier,
        }
    }

    /// Request takedown of a published item.
    ///
    /// `Review` urgency parks the record as `pending` for human triage
    /// and leaves the item untouched. `Immediate` urgency attempts the
    /// platform deletion when supported, degrades to
    /// `manual_recovery_needed` when not, and archives the item in every
    /// branch.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidTransition` when the item is not in
    /// `published` status; no record is created in that case.
    #[instrument(skip(self, reason), fields(item_id = %item_id, urgency = %urgency, triggered_by))]
    pub async fn recover(
        &self,
        item_id: Uuid,
        reason: &str,
        urgency: RecoveryUrgency,
        triggered_by: &str,
    ) -> CadenzaResult<RecoveryRecord> {
        let item = match self.contents.get(item_id).await {
            Ok(item) => item,
            Err(e) if e.is_not_found() => {
                return Err(LifecycleError::new(LifecycleErrorKind::NotFound(
                    item_id.to_string(),
                )))?;
            }
            Err(e) => return Err(e),
        };

        if item.status != ContentStatus::Published {
            return Err(LifecycleError::new(LifecycleErrorKind::InvalidTransition {
                current: item.status.to_string(),
                requested: ContentStatus::Recovered.to_string(),
                allowed: allowed_transitions(item.status)
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            }))?;
        }

        let mut record = RecoveryRecord::new(
            item_id,
            urgency,
            reason,
            triggered_by,
            item.external_id.clone(),
        );
        self.records.insert(record.clone()).await?;

        if urgency == RecoveryUrgency::Review {
            info!(record_id = %record.id, "Recovery queued for human triage");
            return Ok(record);
        }

        record.begin_execution();
        self.records.update(record.clone()).await?;

        let status = if self.publisher.supports_delete(item.platform) {
            match &item.external_id {
                Some(external_id) => match self.publisher.delete(item.platform, external_id).await
                {
                    Ok(true) => RecoveryStatus::Completed,
                    Ok(false) => {
                        warn!(%external_id, "Platform declined to delete the post");
                        RecoveryStatus::Failed
                    }
                    Err(e) => {
                        warn!(%external_id, error = %e, "Platform deletion failed");
                        RecoveryStatus::Failed
                    }
                },
                None => {
                    warn!("Published item carries no external post id; manual takedown required");
                    RecoveryStatus::ManualRecoveryNeeded
                }
            }
        } else {
            warn!(
                external_id = ?item.external_id,
                platform = %item.platform,
                "Platform cannot delete posts; manual takedown required"
            );
            RecoveryStatus::ManualRecoveryNeeded
        };

        record.finish(status);
        self.records.update(record.clone()).await?;

        // The item is archived regardless of the delete outcome.
        let mut details = BTreeMap::new();
        details.insert("record_id".to_string(), record.id.to_string());
        details.insert("reason".to_string(), reason.to_string());
        self.lifecycle
            .transition(item_id, ContentStatus::Recovered, triggered_by, details)
            .await?;

        if let Err(e) = self
            .notifier
            .notify(NotificationEvent::RecoveryComplete {
                item_id,
                record_id: record.id,
                status: record.status,
            })
            .await
        {
            warn!(error = %e, "Notification sink failed, continuing");
        }

        info!(record_id = %record.id, status = %record.status, "Recovery complete");
        Ok(record)
    }
}
