//! Expiry summary — on-demand horizon-bucketed report, independent of the
//! scheduled reminder path.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use wagekit_core::error::Result;
use wagekit_core::traits::DocumentStore;
use wagekit_core::types::{DocumentFilter, DocumentStatus, ExpiringDocument};

use crate::evaluator::start_of_day;

/// One horizon bucket: count plus the underlying records.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryBucket {
    pub count: usize,
    pub documents: Vec<ExpiringDocument>,
}

impl From<Vec<ExpiringDocument>> for SummaryBucket {
    fn from(documents: Vec<ExpiringDocument>) -> Self {
        Self {
            count: documents.len(),
            documents,
        }
    }
}

/// Four independently computed buckets sharing the same lower bound.
///
/// Not guaranteed disjoint: the ≤7 bucket contains the ≤3 one by
/// construction, and `expired` is strictly before today.
#[derive(Debug, Clone, Serialize)]
pub struct ExpirySummary {
    pub expired: SummaryBucket,
    pub within_3_days: SummaryBucket,
    pub within_7_days: SummaryBucket,
    pub within_30_days: SummaryBucket,
}

async fn within_bucket(
    store: &dyn DocumentStore,
    today: DateTime<Utc>,
    days: i64,
) -> Result<SummaryBucket> {
    // Inclusive on both ends: [today, today + days].
    let filter = DocumentFilter::new()
        .expires_from(today)
        .expires_through(today + Duration::days(days))
        .exclude_status(DocumentStatus::Archived);
    Ok(store.find(&filter).await?.into())
}

/// Build the expiry summary as of `now` (truncated to midnight).
pub async fn expiry_summary(store: &dyn DocumentStore, now: DateTime<Utc>) -> Result<ExpirySummary> {
    let today = start_of_day(now);

    // Strict less-than: a document expiring today is not yet expired.
    let expired = store
        .find(
            &DocumentFilter::new()
                .expires_before(today)
                .exclude_status(DocumentStatus::Archived),
        )
        .await?;

    Ok(ExpirySummary {
        expired: expired.into(),
        within_3_days: within_bucket(store, today, 3).await?,
        within_7_days: within_bucket(store, today, 7).await?,
        within_30_days: within_bucket(store, today, 30).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{MemoryStore, active_doc, utc_day};

    #[tokio::test]
    async fn test_bucket_boundaries() {
        let store = MemoryStore::default();
        store.add_document(active_doc("yesterday", utc_day(2024, 5, 31)));
        store.add_document(active_doc("today", utc_day(2024, 6, 1)));
        store.add_document(active_doc("plus3", utc_day(2024, 6, 4)));
        store.add_document(active_doc("plus4", utc_day(2024, 6, 5)));
        store.add_document(active_doc("plus7", utc_day(2024, 6, 8)));
        store.add_document(active_doc("plus30", utc_day(2024, 7, 1)));
        store.add_document(active_doc("plus31", utc_day(2024, 7, 2)));

        let summary = expiry_summary(&store, utc_day(2024, 6, 1)).await.unwrap();

        // Expired is strictly before today: the document expiring today
        // is not in it.
        assert_eq!(summary.expired.count, 1);
        assert_eq!(summary.expired.documents[0].id, "yesterday");

        // ≤K buckets include both today and today+K.
        let ids = |b: &SummaryBucket| {
            let mut v: Vec<String> = b.documents.iter().map(|d| d.id.clone()).collect();
            v.sort();
            v
        };
        assert_eq!(ids(&summary.within_3_days), vec!["plus3", "today"]);
        assert_eq!(
            ids(&summary.within_7_days),
            vec!["plus3", "plus4", "plus7", "today"]
        );
        assert_eq!(summary.within_30_days.count, 5);
        assert!(!ids(&summary.within_30_days).contains(&"plus31".to_string()));
    }

    #[tokio::test]
    async fn test_archived_excluded_from_every_bucket() {
        let store = MemoryStore::default();
        let mut gone = active_doc("gone", utc_day(2024, 5, 1));
        gone.status = wagekit_core::types::DocumentStatus::Archived;
        store.add_document(gone);
        let mut soon = active_doc("soon", utc_day(2024, 6, 2));
        soon.status = wagekit_core::types::DocumentStatus::Archived;
        store.add_document(soon);

        let summary = expiry_summary(&store, utc_day(2024, 6, 1)).await.unwrap();
        assert_eq!(summary.expired.count, 0);
        assert_eq!(summary.within_30_days.count, 0);
    }

    #[tokio::test]
    async fn test_buckets_nest_by_construction() {
        let store = MemoryStore::default();
        store.add_document(active_doc("d1", utc_day(2024, 6, 2)));
        store.add_document(active_doc("d2", utc_day(2024, 6, 10)));

        let summary = expiry_summary(&store, utc_day(2024, 6, 1)).await.unwrap();
        assert!(summary.within_3_days.count <= summary.within_7_days.count);
        assert!(summary.within_7_days.count <= summary.within_30_days.count);
    }
}
