//! # WageKit Reminder
//!
//! Automated document-expiry reminder engine.
//!
//! ## Architecture
//! ```text
//! ReminderScheduler (daily, fixed local time)
//!   └── ReminderEngine::run_check
//!         ├── evaluator: per-threshold one-day window query
//!         ├── dedup: skip (document, threshold) pairs already sent
//!         └── dispatch: resolve worker + recipients → Notifier
//!               └── on success: append dedup record (system write path)
//!
//! summary::expiry_summary — independent on-demand horizon buckets
//! ```
//!
//! Failure isolation: one document's dispatch failure never aborts the
//! others; an error inside one scheduled run never prevents the next.

pub mod dedup;
pub mod dispatch;
pub mod engine;
pub mod evaluator;
pub mod scheduler;
pub mod store;
pub mod summary;

#[cfg(test)]
mod testkit;

pub use engine::{CheckReport, ReminderEngine};
pub use scheduler::ReminderScheduler;
pub use store::SqliteStore;
pub use summary::{ExpirySummary, SummaryBucket, expiry_summary};
