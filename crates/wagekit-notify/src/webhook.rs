//! Webhook notifier — POSTs reminder payloads to a configured HTTP endpoint.

use async_trait::async_trait;

use wagekit_core::config::WebhookConfig;
use wagekit_core::error::{Result, WagekitError};
use wagekit_core::traits::Notifier;
use wagekit_core::types::{ExpiringDocument, Worker};

/// Generic HTTP webhook notifier — POST with JSON body.
pub struct WebhookNotifier {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send_document_expiry_reminder(
        &self,
        document: &ExpiringDocument,
        worker: &Worker,
        days_before_expiry: u32,
        recipients: &[String],
    ) -> Result<()> {
        if self.config.url.is_empty() {
            return Err(WagekitError::notify("webhook url not configured"));
        }

        let mut req = self
            .client
            .post(&self.config.url)
            .json(&serde_json::json!({
                "event": "document-expiry-reminder",
                "document_id": document.id,
                "document_name": document.name,
                "worker": worker.full_name(),
                "expiry_date": document.expiry_date.to_rfc3339(),
                "days_before_expiry": days_before_expiry,
                "recipients": recipients,
            }))
            .timeout(std::time::Duration::from_secs(10));

        for (key, value) in &self.config.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let resp = req
            .send()
            .await
            .map_err(|e| WagekitError::notify(format!("Webhook send failed: {e}")))?;

        if resp.status().is_success() {
            tracing::info!(
                "✅ Webhook reminder delivered for document {}",
                document.id
            );
            Ok(())
        } else {
            let status = resp.status();
            Err(WagekitError::notify(format!("Webhook error {status}")))
        }
    }
}
