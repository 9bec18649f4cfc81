//! Domain data model — documents, workers, and reminder settings.
//!
//! Status and notification kinds are closed enums validated at ingestion;
//! free-form strings from storage are rejected with `WagekitError::Invalid`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WagekitError;

/// Lifecycle status of a worker document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentStatus {
    Active,
    Archived,
    ExpiringSoon,
    Expired,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::ExpiringSoon => "expiring-soon",
            Self::Expired => "expired",
        }
    }
}

impl FromStr for DocumentStatus {
    type Err = WagekitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            "expiring-soon" => Ok(Self::ExpiringSoon),
            "expired" => Ok(Self::Expired),
            other => Err(WagekitError::invalid(format!(
                "unknown document status '{other}'"
            ))),
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which notification categories a recipient has opted into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationType {
    DocumentExpiry,
    All,
}

/// A globally configured reminder recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderRecipient {
    pub email: String,
    #[serde(default = "bool_true")]
    pub active: bool,
    #[serde(default)]
    pub notification_types: Vec<NotificationType>,
}

fn bool_true() -> bool {
    true
}

/// Company-wide document-expiry reminder settings.
///
/// Edited elsewhere in the platform; the reminder engine only reads it.
/// The `Default` is the explicit "not configured" state: disabled, no
/// thresholds, no recipients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderSettings {
    #[serde(default)]
    pub enabled: bool,
    /// Day-counts before expiry at which a reminder fires, e.g. [30, 7, 3].
    #[serde(default)]
    pub reminder_days: Vec<u32>,
    #[serde(default)]
    pub recipients: Vec<ReminderRecipient>,
}

impl ReminderSettings {
    /// Emails of active recipients opted into document-expiry notifications.
    pub fn document_expiry_recipients(&self) -> Vec<String> {
        self.recipients
            .iter()
            .filter(|r| {
                r.active
                    && r.notification_types
                        .iter()
                        .any(|t| matches!(t, NotificationType::DocumentExpiry | NotificationType::All))
            })
            .map(|r| r.email.clone())
            .collect()
    }
}

/// A persisted dedup record: one reminder already sent for a threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderRecord {
    pub days_before_expiry: u32,
    pub sent_at: DateTime<Utc>,
    pub sent_to: Vec<String>,
}

/// A worker referenced by documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Worker {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// A document's worker field: embedded record or a reference to resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkerRef {
    Embedded(Worker),
    Id(String),
}

/// A worker document with an expiry date and reminder bookkeeping.
///
/// `reminders_sent` is append-only under the engine's control: at most one
/// entry per distinct threshold, never pruned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiringDocument {
    pub id: String,
    pub name: String,
    pub worker: WorkerRef,
    pub expiry_date: DateTime<Utc>,
    pub status: DocumentStatus,
    #[serde(default = "bool_true")]
    pub reminder_enabled: bool,
    #[serde(default)]
    pub custom_recipients: Option<Vec<String>>,
    #[serde(default)]
    pub reminders_sent: Vec<ReminderRecord>,
}

/// Marker for the system-internal write path.
///
/// Appends to `reminders_sent` go through this context to make clear the
/// write is not attributable to any end-user request and bypasses end-user
/// authorization.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemContext;

/// Query filter for the document store.
///
/// Date bounds are expressed explicitly: `expires_from` is inclusive,
/// `expires_before` exclusive, `expires_through` inclusive — the reminder
/// window uses from/before, the summary buckets use from/through.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub expires_from: Option<DateTime<Utc>>,
    pub expires_before: Option<DateTime<Utc>>,
    pub expires_through: Option<DateTime<Utc>>,
    pub exclude_status: Option<DocumentStatus>,
    pub reminder_enabled: Option<bool>,
}

impl DocumentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inclusive lower bound on `expiry_date`.
    pub fn expires_from(mut self, at: DateTime<Utc>) -> Self {
        self.expires_from = Some(at);
        self
    }

    /// Exclusive upper bound on `expiry_date`.
    pub fn expires_before(mut self, at: DateTime<Utc>) -> Self {
        self.expires_before = Some(at);
        self
    }

    /// Inclusive upper bound on `expiry_date`.
    pub fn expires_through(mut self, at: DateTime<Utc>) -> Self {
        self.expires_through = Some(at);
        self
    }

    pub fn exclude_status(mut self, status: DocumentStatus) -> Self {
        self.exclude_status = Some(status);
        self
    }

    pub fn reminder_enabled(mut self, enabled: bool) -> Self {
        self.reminder_enabled = Some(enabled);
        self
    }

    /// Predicate form of the filter, for in-memory stores.
    pub fn matches(&self, doc: &ExpiringDocument) -> bool {
        if let Some(from) = self.expires_from
            && doc.expiry_date < from
        {
            return false;
        }
        if let Some(before) = self.expires_before
            && doc.expiry_date >= before
        {
            return false;
        }
        if let Some(through) = self.expires_through
            && doc.expiry_date > through
        {
            return false;
        }
        if let Some(excluded) = self.exclude_status
            && doc.status == excluded
        {
            return false;
        }
        if let Some(enabled) = self.reminder_enabled
            && doc.reminder_enabled != enabled
        {
            return false;
        }
        true
    }
}
