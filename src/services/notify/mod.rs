pub mod store;
pub mod webhook;

use async_trait::async_trait;

use crate::models::NotificationEvent;

/// Delivery seam for notification events. Sinks are best-effort: a failing
/// sink is logged and never fails the transition that produced the event.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, event: &NotificationEvent) -> anyhow::Result<()>;
}

pub struct Notifier {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl Notifier {
    pub fn new(sinks: Vec<Box<dyn NotificationSink>>) -> Self {
        Self { sinks }
    }

    pub async fn dispatch(&self, events: &[NotificationEvent]) {
        for event in events {
            for sink in &self.sinks {
                if let Err(e) = sink.deliver(event).await {
                    tracing::error!(
                        error = %e,
                        recipient = %event.recipient_id,
                        title = %event.title,
                        "notification delivery failed"
                    );
                }
            }
        }
    }
}
