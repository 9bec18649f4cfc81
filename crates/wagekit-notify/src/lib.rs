//! # WageKit Notify
//!
//! `Notifier` implementations behind the reminder engine: SMTP email,
//! generic HTTP webhook, and a log-only backend for development.

pub mod email;
pub mod webhook;

use std::sync::Arc;

use async_trait::async_trait;

use wagekit_core::config::{NotifyBackend, NotifyConfig};
use wagekit_core::error::Result;
use wagekit_core::traits::Notifier;
use wagekit_core::types::{ExpiringDocument, Worker};

pub use email::EmailNotifier;
pub use webhook::WebhookNotifier;

/// Log-only notifier — records nothing, delivers nowhere.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_document_expiry_reminder(
        &self,
        document: &ExpiringDocument,
        worker: &Worker,
        days_before_expiry: u32,
        recipients: &[String],
    ) -> Result<()> {
        tracing::info!(
            "📢 [log] Expiry reminder: '{}' for {} expires in {} day(s) → {}",
            document.name,
            worker.full_name(),
            days_before_expiry,
            recipients.join(", ")
        );
        Ok(())
    }
}

/// Build the configured notifier backend.
pub fn from_config(config: &NotifyConfig) -> Arc<dyn Notifier> {
    match config.backend {
        NotifyBackend::Email => Arc::new(EmailNotifier::new(config.email.clone())),
        NotifyBackend::Webhook => Arc::new(WebhookNotifier::new(config.webhook.clone())),
        NotifyBackend::Log => Arc::new(LogNotifier),
    }
}
