//! Collaborator traits the reminder engine depends on.
//!
//! The engine never talks to SQLite, SMTP, or HTTP directly — it sees only
//! these contracts. Production implementations live in `wagekit-reminder`
//! (stores) and `wagekit-notify` (notifier); tests use in-memory doubles.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    DocumentFilter, ExpiringDocument, ReminderRecord, ReminderSettings, SystemContext, Worker,
};

/// Read access to company-wide reminder settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// The current document-expiry reminder settings, `None` when the
    /// company has never configured them.
    async fn reminder_settings(&self) -> Result<Option<ReminderSettings>>;
}

/// Query and append access to worker documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<ExpiringDocument>>;

    /// Append a dedup record to a document's `reminders_sent`, via the
    /// system-internal write path.
    ///
    /// Conditional: returns `Ok(false)` without writing when an entry for
    /// the same `days_before_expiry` already exists. This is the
    /// single-writer guarantee for concurrent dispatch on one
    /// (document, threshold) pair.
    async fn append_reminder(
        &self,
        document_id: &str,
        record: ReminderRecord,
        ctx: &SystemContext,
    ) -> Result<bool>;
}

/// Worker lookup by id.
#[async_trait]
pub trait WorkerStore: Send + Sync {
    /// Fails with `WagekitError::NotFound` when the worker does not exist.
    async fn get(&self, id: &str) -> Result<Worker>;
}

/// Outbound notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one expiry reminder for a (document, threshold) pair.
    async fn send_document_expiry_reminder(
        &self,
        document: &ExpiringDocument,
        worker: &Worker,
        days_before_expiry: u32,
        recipients: &[String],
    ) -> Result<()>;
}
