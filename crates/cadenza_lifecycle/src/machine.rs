//! Transition table and the machine that enforces it.

use cadenza_core::{AuditEvent, ContentItem, ContentStatus};
use cadenza_error::{CadenzaResult, LifecycleError, LifecycleErrorKind};
use cadenza_interface::{AuditLog, ContentRepository};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Statuses reachable from `from` in one transition.
///
/// `published` is terminal in practice but re-enterable: the only exit
/// is `recovered`, and a recovered item can return to review as a
/// replacement.
pub fn allowed_transitions(from: ContentStatus) -> &'static [ContentStatus] {
    use ContentStatus::*;
    match from {
        Draft => &[InReview],
        InReview => &[Approved, Rejected, Skipped],
        Approved => &[Published, InReview],
        Rejected => &[InReview],
        Skipped => &[InReview],
        Published => &[Recovered],
        Recovered => &[InReview],
    }
}

/// Validates and records every status transition for content items.
///
/// # Examples
///
/// ```
/// use cadenza_core::ContentStatus;
/// use cadenza_lifecycle::allowed_transitions;
///
/// assert!(allowed_transitions(ContentStatus::Draft).contains(&ContentStatus::InReview));
/// assert!(!allowed_transitions(ContentStatus::Draft).contains(&ContentStatus::Published));
/// ```
#[derive(Clone)]
pub struct LifecycleMachine {
    contents: Arc<dyn ContentRepository>,
    audit: Arc<dyn AuditLog>,
}

impl LifecycleMachine {
    /// Create a machine over the given content repository and audit log.
    pub fn new(contents: Arc<dyn ContentRepository>, audit: Arc<dyn AuditLog>) -> Self {
        Self { contents, audit }
    }

    /// Whether `to` may follow `from`.
    pub fn can_transition(from: ContentStatus, to: ContentStatus) -> bool {
        allowed_transitions(from).contains(&to)
    }

    /// Move an item to `new_status`, appending one audit event.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if `new_status` is not reachable from the
    ///   item's current status; the item is left unchanged.
    /// - `NotFound` if no item exists with `item_id`.
    #[instrument(skip(self, details), fields(item_id = %item_id, new_status = %new_status, actor))]
    pub async fn transition(
        &self,
        item_id: Uuid,
        new_status: ContentStatus,
        actor: &str,
        details: BTreeMap<String, String>,
    ) -> CadenzaResult<ContentItem> {
        let mut item = match self.contents.get(item_id).await {
            Ok(item) => item,
            Err(e) if e.is_not_found() => {
                return Err(LifecycleError::new(LifecycleErrorKind::NotFound(
                    item_id.to_string(),
                )))?;
            }
            Err(e) => return Err(e),
        };

        let allowed = allowed_transitions(item.status);
        if !allowed.contains(&new_status) {
            warn!(current = %item.status, "Rejected lifecycle transition");
            return Err(LifecycleError::new(LifecycleErrorKind::InvalidTransition {
                current: item.status.to_string(),
                requested: new_status.to_string(),
                allowed: allowed.iter().map(ToString::to_string).collect(),
            }))?;
        }

        let old_status = item.status;
        item.status = new_status;
        item.touch();
        self.contents.update(item.clone()).await?;
        self.audit
            .append(AuditEvent::record(
                item_id, old_status, new_status, actor, details,
            ))
            .await?;

        info!(old_status = %old_status, "Lifecycle transition recorded");
        Ok(item)
    }
}
