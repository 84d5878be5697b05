//! Content items and their lifecycle statuses.

use crate::{MediaRef, Platform};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a content item.
///
/// The permitted transitions between statuses are owned by the lifecycle
/// state machine; this enum only names the states.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContentStatus {
    /// Freshly generated, not yet submitted for review
    Draft,
    /// Awaiting a review decision
    InReview,
    /// Cleared for publishing
    Approved,
    /// Review declined the item
    Rejected,
    /// Review set the item aside without a verdict
    Skipped,
    /// Live on the platform
    Published,
    /// Taken down or archived after publishing
    Recovered,
}

impl ContentStatus {
    /// Whether a publish job may be scheduled for an item in this status.
    pub fn is_publishable(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Whether the item is currently live on its platform.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Published)
    }
}

impl Default for ContentStatus {
    fn default() -> Self {
        Self::Draft
    }
}

/// One schedulable piece of client content.
///
/// Items are created when content is generated, mutated only through the
/// lifecycle state machine, and never physically deleted — takedown moves
/// them to [`ContentStatus::Recovered`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique item id
    pub id: Uuid,
    /// Owning client account
    pub account_id: Uuid,
    /// Platform this item targets
    pub platform: Platform,
    /// Post text
    pub body: String,
    /// Resolved media asset, required before dispatch
    pub media: Option<MediaRef>,
    /// Current lifecycle status
    pub status: ContentStatus,
    /// Platform-assigned post id, set on successful publish
    pub external_id: Option<String>,
    /// Platform-assigned post URL, set on successful publish
    pub external_url: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last mutation time
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// Create a new draft item for an account.
    pub fn new(account_id: Uuid, platform: Platform, body: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            account_id,
            platform,
            body: body.into(),
            media: None,
            status: ContentStatus::Draft,
            external_id: None,
            external_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a resolved media asset.
    pub fn with_media(mut self, media: MediaRef) -> Self {
        self.media = Some(media);
        self
    }

    /// Refresh the mutation timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_string_round_trip() {
        assert_eq!(ContentStatus::InReview.to_string(), "in_review");
        assert_eq!(
            "recovered".parse::<ContentStatus>().unwrap(),
            ContentStatus::Recovered
        );
    }

    #[test]
    fn new_items_start_as_draft() {
        let item = ContentItem::new(Uuid::new_v4(), Platform::Mastodon, "hello");
        assert_eq!(item.status, ContentStatus::Draft);
        assert!(item.media.is_none());
        assert!(!item.status.is_publishable());
    }

    #[test]
    fn only_approved_is_publishable() {
        assert!(ContentStatus::Approved.is_publishable());
        assert!(!ContentStatus::Published.is_publishable());
        assert!(!ContentStatus::Draft.is_publishable());
    }
}
