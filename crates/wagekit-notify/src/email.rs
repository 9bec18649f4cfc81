//! Email notifier — sends expiry reminders via SMTP (async lettre).

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message as LettreMessage, message::Mailbox,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};

use wagekit_core::config::EmailConfig;
use wagekit_core::error::{Result, WagekitError};
use wagekit_core::traits::Notifier;
use wagekit_core::types::{ExpiringDocument, Worker};

/// SMTP-backed notifier. One message per (document, threshold), all
/// recipients on the same message.
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn subject(document: &ExpiringDocument, days: u32) -> String {
        match days {
            0 => format!("Document expires today: {}", document.name),
            1 => format!("Document expires tomorrow: {}", document.name),
            n => format!("Document expires in {n} days: {}", document.name),
        }
    }

    fn body(document: &ExpiringDocument, worker: &Worker, days: u32) -> String {
        format!(
            "The document '{}' for {} expires on {} ({} day(s) from now).\n\n\
             Please arrange a renewal before the expiry date.\n\n\
             — WageKit document-expiry reminders",
            document.name,
            worker.full_name(),
            document.expiry_date.format("%Y-%m-%d"),
            days
        )
    }

    async fn send(&self, to: &[String], subject: &str, body: &str) -> Result<()> {
        let from_name = self.config.from_name.as_deref().unwrap_or("WageKit");
        let from_mailbox: Mailbox = format!("{from_name} <{}>", self.config.from_email)
            .parse()
            .map_err(|e| WagekitError::notify(format!("Invalid from: {e}")))?;

        let mut builder = LettreMessage::builder()
            .from(from_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);
        for recipient in to {
            let mailbox: Mailbox = recipient
                .parse()
                .map_err(|e| WagekitError::notify(format!("Invalid recipient '{recipient}': {e}")))?;
            builder = builder.to(mailbox);
        }

        let email = builder
            .body(body.to_string())
            .map_err(|e| WagekitError::notify(format!("Build email: {e}")))?;

        let creds = Credentials::new(
            self.config.from_email.clone(),
            self.config.password.clone(),
        );
        let mailer =
            AsyncSmtpTransport::<lettre::Tokio1Executor>::starttls_relay(&self.config.smtp_host)
                .map_err(|e| WagekitError::notify(format!("SMTP relay: {e}")))?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build();

        mailer
            .send(email)
            .await
            .map_err(|e| WagekitError::notify(format!("SMTP send: {e}")))?;

        tracing::info!("📤 Reminder email sent to {} recipient(s)", to.len());
        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send_document_expiry_reminder(
        &self,
        document: &ExpiringDocument,
        worker: &Worker,
        days_before_expiry: u32,
        recipients: &[String],
    ) -> Result<()> {
        if recipients.is_empty() {
            return Err(WagekitError::notify("no recipients resolved"));
        }
        let subject = Self::subject(document, days_before_expiry);
        let body = Self::body(document, worker, days_before_expiry);
        self.send(recipients, &subject, &body).await
    }
}
