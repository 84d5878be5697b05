//! Notification events surfaced to the external sink.

use crate::{Platform, RecoveryStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A terminal pipeline outcome surfaced to the notification sink.
///
/// Delivery is fire-and-forget: a failing sink never aborts or retries
/// the publish or recovery flow that emitted the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// A publish job completed successfully
    PublishComplete {
        /// The published item
        item_id: Uuid,
        /// Target platform
        platform: Platform,
        /// Platform-assigned post id
        external_id: String,
        /// Platform-assigned post URL
        url: String,
    },
    /// A publish job terminally failed
    PublishFailed {
        /// The item that failed to publish
        item_id: Uuid,
        /// Target platform
        platform: Platform,
        /// Consecutive failures at the time of the alert
        retry_count: u32,
        /// The final error
        reason: String,
    },
    /// A recovery request reached a terminal status
    RecoveryComplete {
        /// The recovered item
        item_id: Uuid,
        /// The recovery record
        record_id: Uuid,
        /// Final record status
        status: RecoveryStatus,
    },
}

impl NotificationEvent {
    /// Event name used in logs and sink routing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PublishComplete { .. } => "publish_complete",
            Self::PublishFailed { .. } => "publish_failed",
            Self::RecoveryComplete { .. } => "recovery_complete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serde_tags_by_name() {
        let event = NotificationEvent::PublishFailed {
            item_id: Uuid::new_v4(),
            platform: Platform::Tumblr,
            retry_count: 3,
            reason: "gateway timeout".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "publish_failed");
        assert_eq!(event.name(), "publish_failed");
    }
}
