//! Dispatch executor — resolves the worker and recipients for a candidate
//! document, sends the reminder, and records the dedup entry.

use chrono::{DateTime, Utc};

use wagekit_core::error::Result;
use wagekit_core::traits::{DocumentStore, Notifier, WorkerStore};
use wagekit_core::types::{ExpiringDocument, ReminderRecord, SystemContext, Worker, WorkerRef};

/// Outcome of a single (document, threshold) dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Notification sent and (best-effort) recorded.
    Sent,
    /// Worker lookup failed; this document/threshold skipped, run continues.
    SkippedLookup,
    /// A concurrent dispatcher recorded this threshold between our dedup
    /// check and append. Our notification already went out, so the
    /// recipient received a duplicate — the accepted residual of the
    /// conditional-update strategy; the dedup record itself stays single.
    AlreadyRecorded,
}

/// Resolve the recipient list for a document.
///
/// Non-empty `custom_recipients` is used exclusively; otherwise the
/// globally configured document-expiry recipients apply. The worker's own
/// email is intentionally not included.
pub fn resolve_recipients(document: &ExpiringDocument, global: &[String]) -> Vec<String> {
    match &document.custom_recipients {
        Some(custom) if !custom.is_empty() => custom.clone(),
        _ => global.to_vec(),
    }
}

async fn resolve_worker(
    document: &ExpiringDocument,
    workers: &dyn WorkerStore,
) -> Result<Option<Worker>> {
    match &document.worker {
        WorkerRef::Embedded(worker) => Ok(Some(worker.clone())),
        WorkerRef::Id(id) => match workers.get(id).await {
            Ok(worker) => Ok(Some(worker)),
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    "⚠️ Worker {} not found for document {} — skipping",
                    id,
                    document.id
                );
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ Worker lookup failed for document {}: {e} — skipping",
                    document.id
                );
                Ok(None)
            }
        },
    }
}

/// Send one reminder and persist its dedup record.
///
/// On notification failure the error propagates and `reminders_sent` stays
/// untouched, so the threshold remains eligible on a later run. A persist
/// failure after a successful send is logged and swallowed: the documented
/// at-least-once trade-off.
pub async fn dispatch_one(
    document: &ExpiringDocument,
    days_before_expiry: u32,
    now: DateTime<Utc>,
    global_recipients: &[String],
    workers: &dyn WorkerStore,
    documents: &dyn DocumentStore,
    notifier: &dyn Notifier,
) -> Result<DispatchOutcome> {
    let Some(worker) = resolve_worker(document, workers).await? else {
        return Ok(DispatchOutcome::SkippedLookup);
    };

    let recipients = resolve_recipients(document, global_recipients);

    notifier
        .send_document_expiry_reminder(document, &worker, days_before_expiry, &recipients)
        .await?;

    let record = ReminderRecord {
        days_before_expiry,
        sent_at: now,
        sent_to: recipients,
    };
    match documents
        .append_reminder(&document.id, record, &SystemContext)
        .await
    {
        Ok(true) => Ok(DispatchOutcome::Sent),
        Ok(false) => {
            tracing::debug!(
                "Reminder for document {} at {} days already recorded",
                document.id,
                days_before_expiry
            );
            Ok(DispatchOutcome::AlreadyRecorded)
        }
        Err(e) => {
            // Accepted risk: the next run may send this threshold again.
            tracing::warn!(
                "⚠️ Sent reminder for document {} but failed to record it: {e}",
                document.id
            );
            Ok(DispatchOutcome::Sent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wagekit_core::types::DocumentStatus;

    fn doc(custom: Option<Vec<String>>) -> ExpiringDocument {
        ExpiringDocument {
            id: "doc-1".into(),
            name: "Work permit".into(),
            worker: WorkerRef::Id("w-1".into()),
            expiry_date: Utc::now(),
            status: DocumentStatus::Active,
            reminder_enabled: true,
            custom_recipients: custom,
            reminders_sent: Vec::new(),
        }
    }

    #[test]
    fn test_custom_recipients_are_exclusive() {
        let global = vec!["hr@x.com".to_string()];
        let d = doc(Some(vec!["manager@x.com".into()]));
        assert_eq!(resolve_recipients(&d, &global), vec!["manager@x.com".to_string()]);
    }

    #[test]
    fn test_empty_custom_falls_back_to_global() {
        let global = vec!["hr@x.com".to_string()];
        assert_eq!(resolve_recipients(&doc(Some(vec![])), &global), global);
        assert_eq!(resolve_recipients(&doc(None), &global), global);
    }
}
