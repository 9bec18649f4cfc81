//! Dedup guard — has a reminder for this threshold already been sent?

use wagekit_core::types::ExpiringDocument;

/// True when no reminder has been recorded for this threshold yet.
///
/// Applied before every dispatch attempt: re-running the full check for an
/// unchanged document never re-sends. The document store's conditional
/// append backstops this for concurrent dispatchers.
pub fn eligible(document: &ExpiringDocument, days_before_expiry: u32) -> bool {
    !document
        .reminders_sent
        .iter()
        .any(|r| r.days_before_expiry == days_before_expiry)
}
