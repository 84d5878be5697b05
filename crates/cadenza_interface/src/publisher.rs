//! The platform publisher capability.

use async_trait::async_trait;
use cadenza_core::{Platform, PublishPayload, PublishReceipt};
use cadenza_error::PublishError;

/// External capability that performs the actual platform calls.
///
/// Implementations own credentials and network transport. The pipeline
/// only branches on the outcomes: the error kind decides whether a
/// failed dispatch is retried, and [`supports_delete`] decides whether a
/// recovery request can be automated.
///
/// [`supports_delete`]: Publisher::supports_delete
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish a payload to a platform, returning the post id and URL.
    async fn publish(
        &self,
        platform: Platform,
        payload: &PublishPayload,
    ) -> Result<PublishReceipt, PublishError>;

    /// Whether the platform supports deleting a published post.
    fn supports_delete(&self, platform: Platform) -> bool;

    /// Delete a published post. Returns whether the platform confirmed
    /// the deletion.
    async fn delete(&self, platform: Platform, external_id: &str) -> Result<bool, PublishError>;
}
