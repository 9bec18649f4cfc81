//! Threshold evaluator — computes the one-day matching window for a
//! reminder threshold and queries the document store for candidates.

use chrono::{DateTime, Duration, Utc};

use wagekit_core::error::Result;
use wagekit_core::traits::DocumentStore;
use wagekit_core::types::{DocumentFilter, DocumentStatus, ExpiringDocument};

/// Truncate a timestamp to midnight UTC.
pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive()
        .and_time(chrono::NaiveTime::MIN)
        .and_utc()
}

/// The matching window for threshold N: `[today + N days, today + N+1 days)`.
///
/// An exact one-day window, not "within N days" — each threshold fires on
/// exactly one calendar day of a document's life.
pub fn threshold_window(now: DateTime<Utc>, days_before_expiry: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    let target = start_of_day(now) + Duration::days(i64::from(days_before_expiry));
    (target, target + Duration::days(1))
}

/// Query candidates for one threshold: expiry inside the window, not
/// archived, reminders enabled on the document.
pub async fn candidates(
    store: &dyn DocumentStore,
    now: DateTime<Utc>,
    days_before_expiry: u32,
) -> Result<Vec<ExpiringDocument>> {
    let (from, until) = threshold_window(now, days_before_expiry);
    let filter = DocumentFilter::new()
        .expires_from(from)
        .expires_before(until)
        .exclude_status(DocumentStatus::Archived)
        .reminder_enabled(true);
    store.find(&filter).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_is_one_day_half_open() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 14, 23, 5).unwrap();
        let (from, until) = threshold_window(now, 7);
        assert_eq!(from, Utc.with_ymd_and_hms(2024, 6, 8, 0, 0, 0).unwrap());
        assert_eq!(until, Utc.with_ymd_and_hms(2024, 6, 9, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_window_truncates_time_of_day() {
        // Running at 00:00 and at 23:59 must produce the same window.
        let early = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 23, 59, 59).unwrap();
        assert_eq!(threshold_window(early, 30), threshold_window(late, 30));
    }

    #[test]
    fn test_zero_threshold_is_today() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let (from, until) = threshold_window(now, 0);
        assert_eq!(from, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(until, Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap());
    }
}
