//! The notification sink capability.

use async_trait::async_trait;
use cadenza_core::NotificationEvent;
use cadenza_error::CadenzaResult;

/// External sink for terminal pipeline outcomes.
///
/// Delivery is fire-and-forget: callers log and discard sink errors, so
/// a failing channel never aborts or retries the publish or recovery
/// flow that emitted the event.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one event.
    async fn notify(&self, event: NotificationEvent) -> CadenzaResult<()>;
}
