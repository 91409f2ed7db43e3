use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use super::NotificationSink;
use crate::models::NotificationEvent;

/// Forwards events to an external endpoint (push gateway, ops channel) as
/// JSON. The body is signed with HMAC-SHA1 so the receiver can authenticate
/// the sender.
pub struct WebhookSink {
    url: String,
    secret: String,
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(url: String, secret: String) -> Self {
        Self {
            url,
            secret,
            client: reqwest::Client::new(),
        }
    }

    fn sign(&self, body: &str) -> Option<String> {
        let mut mac = Hmac::<Sha1>::new_from_slice(self.secret.as_bytes()).ok()?;
        mac.update(body.as_bytes());
        let result = mac.finalize().into_bytes();
        Some(base64::engine::general_purpose::STANDARD.encode(result))
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn deliver(&self, event: &NotificationEvent) -> anyhow::Result<()> {
        let body = serde_json::to_string(event).context("failed to serialize event")?;

        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .body(body.clone());

        if !self.secret.is_empty() {
            if let Some(signature) = self.sign(&body) {
                request = request.header("X-Fixly-Signature", signature);
            }
        }

        request
            .send()
            .await
            .context("failed to deliver webhook notification")?
            .error_for_status()
            .context("notification webhook returned error")?;

        Ok(())
    }
}
