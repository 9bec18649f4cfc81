//! # WageKit Core
//!
//! Shared foundation for the WageKit payroll/HR backend: configuration,
//! error taxonomy, the document/worker/settings data model, and the
//! collaborator traits (stores, notifier) the reminder engine depends on.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::WagekitConfig;
pub use error::{Result, WagekitError};
pub use traits::{DocumentStore, Notifier, SettingsStore, WorkerStore};
pub use types::{
    DocumentFilter, DocumentStatus, ExpiringDocument, NotificationType, ReminderRecipient,
    ReminderRecord, ReminderSettings, SystemContext, Worker, WorkerRef,
};
