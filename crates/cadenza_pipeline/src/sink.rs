//! A notification sink that writes events to the tracing subscriber.

use async_trait::async_trait;
use cadenza_core::NotificationEvent;
use cadenza_error::CadenzaResult;
use cadenza_interface::NotificationSink;
use tracing::info;

/// Default sink: renders each event as a structured log line.
///
/// Useful for hosts without an external notification channel and as the
/// quiet default in examples and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[async_trait]
impl NotificationSink for TracingSink {
    async fn notify(&self, event: NotificationEvent) -> CadenzaResult<()> {
        let payload = serde_json::to_string(&event).unwrap_or_else(|_| event.name().to_string());
        info!(event = event.name(), %payload, "Pipeline notification");
        Ok(())
    }
}
