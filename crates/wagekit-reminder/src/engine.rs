//! Reminder engine — the full per-run check routine.
//!
//! For each configured threshold, in order: evaluate candidates, filter
//! through the dedup guard, dispatch the eligible ones. Failures are
//! isolated per document; a top-level store error aborts only the current
//! run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use wagekit_core::error::Result;
use wagekit_core::traits::{DocumentStore, Notifier, SettingsStore, WorkerStore};

use crate::dedup;
use crate::dispatch::{self, DispatchOutcome};
use crate::evaluator;

/// Per-run outcome counters, returned by the manual trigger too.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    /// Thresholds evaluated this run, in configured order.
    pub thresholds: Vec<u32>,
    /// Candidate documents across all thresholds.
    pub candidates: usize,
    /// Notifications sent.
    pub sent: usize,
    /// Candidates skipped (already sent, or worker lookup failed).
    pub skipped: usize,
    /// Dispatch failures (document stays eligible for a later run).
    pub failed: usize,
}

/// The expiry-reminder engine. Owns nothing but its collaborators.
pub struct ReminderEngine {
    settings: Arc<dyn SettingsStore>,
    documents: Arc<dyn DocumentStore>,
    workers: Arc<dyn WorkerStore>,
    notifier: Arc<dyn Notifier>,
}

impl ReminderEngine {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        documents: Arc<dyn DocumentStore>,
        workers: Arc<dyn WorkerStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            settings,
            documents,
            workers,
            notifier,
        }
    }

    /// Run the full expiry check as of `now`.
    ///
    /// Missing settings, disabled reminders, no thresholds, or no active
    /// recipients are a deliberate no-op: no document queries are issued.
    pub async fn run_check(&self, now: DateTime<Utc>) -> Result<CheckReport> {
        let settings = self
            .settings
            .reminder_settings()
            .await?
            .unwrap_or_default();

        if !settings.enabled {
            tracing::info!("📋 Document-expiry reminders disabled — nothing to do");
            return Ok(CheckReport::default());
        }
        if settings.reminder_days.is_empty() {
            tracing::info!("📋 No reminder thresholds configured — nothing to do");
            return Ok(CheckReport::default());
        }
        let global_recipients = settings.document_expiry_recipients();
        if global_recipients.is_empty() {
            tracing::info!("📋 No active document-expiry recipients — nothing to do");
            return Ok(CheckReport::default());
        }

        let mut report = CheckReport {
            thresholds: settings.reminder_days.clone(),
            ..CheckReport::default()
        };

        for &days in &settings.reminder_days {
            let candidates = evaluator::candidates(self.documents.as_ref(), now, days).await?;
            report.candidates += candidates.len();

            for doc in &candidates {
                if !dedup::eligible(doc, days) {
                    report.skipped += 1;
                    continue;
                }

                match dispatch::dispatch_one(
                    doc,
                    days,
                    now,
                    &global_recipients,
                    self.workers.as_ref(),
                    self.documents.as_ref(),
                    self.notifier.as_ref(),
                )
                .await
                {
                    Ok(DispatchOutcome::Sent) => {
                        report.sent += 1;
                        tracing::info!(
                            "📧 Reminder sent for document {} ({} days before expiry)",
                            doc.id,
                            days
                        );
                    }
                    Ok(DispatchOutcome::SkippedLookup | DispatchOutcome::AlreadyRecorded) => {
                        report.skipped += 1;
                    }
                    Err(e) => {
                        report.failed += 1;
                        tracing::warn!(
                            "⚠️ Reminder dispatch failed for document {} at {} days: {e}",
                            doc.id,
                            days
                        );
                    }
                }
            }
        }

        tracing::info!(
            "⏰ Expiry check complete: {} candidate(s), {} sent, {} skipped, {} failed",
            report.candidates,
            report.sent,
            report.skipped,
            report.failed
        );
        Ok(report)
    }
}
