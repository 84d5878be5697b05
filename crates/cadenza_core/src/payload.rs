//! Payload and receipt types exchanged with platform publishers.

use crate::Platform;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A resolved media asset attached to a content item.
///
/// # Examples
///
/// ```
/// use cadenza_core::MediaRef;
///
/// let media = MediaRef::new("https://cdn.example.com/a.png", "image/png");
/// assert_eq!(media.mime_type, "image/png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct MediaRef {
    /// Where the asset can be fetched from
    #[new(into)]
    pub url: String,
    /// MIME type of the asset
    #[new(into)]
    pub mime_type: String,
}

/// The content handed to a platform publisher for one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishPayload {
    /// The item being published
    pub item_id: Uuid,
    /// Owning client account
    pub account_id: Uuid,
    /// Target platform
    pub platform: Platform,
    /// Post text
    pub body: String,
    /// Resolved media asset; presence is checked before dispatch
    pub media: MediaRef,
}

/// What a platform returns for a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct PublishReceipt {
    /// Platform-assigned post id
    #[new(into)]
    pub external_id: String,
    /// Platform-assigned post URL
    #[new(into)]
    pub url: String,
}
