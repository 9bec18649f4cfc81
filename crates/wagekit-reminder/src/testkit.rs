//! In-memory collaborator doubles shared by the engine/summary tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use wagekit_core::error::{Result, WagekitError};
use wagekit_core::traits::{DocumentStore, Notifier, SettingsStore, WorkerStore};
use wagekit_core::types::{
    DocumentFilter, DocumentStatus, ExpiringDocument, NotificationType, ReminderRecipient,
    ReminderRecord, ReminderSettings, SystemContext, Worker, WorkerRef,
};

/// In-memory settings + document + worker store.
#[derive(Default)]
pub struct MemoryStore {
    pub settings: Mutex<Option<ReminderSettings>>,
    pub documents: Mutex<Vec<ExpiringDocument>>,
    pub workers: Mutex<Vec<Worker>>,
    find_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn with_settings(settings: ReminderSettings) -> Self {
        Self {
            settings: Mutex::new(Some(settings)),
            ..Self::default()
        }
    }

    pub fn add_document(&self, doc: ExpiringDocument) {
        self.documents.lock().unwrap().push(doc);
    }

    pub fn add_worker(&self, worker: Worker) {
        self.workers.lock().unwrap().push(worker);
    }

    pub fn document(&self, id: &str) -> ExpiringDocument {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .expect("document exists")
    }

    /// Number of `find` queries issued against the document store.
    pub fn find_call_count(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn reminder_settings(&self) -> Result<Option<ReminderSettings>> {
        Ok(self.settings.lock().unwrap().clone())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<ExpiringDocument>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect())
    }

    async fn append_reminder(
        &self,
        document_id: &str,
        record: ReminderRecord,
        _ctx: &SystemContext,
    ) -> Result<bool> {
        let mut docs = self.documents.lock().unwrap();
        let doc = docs
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or_else(|| WagekitError::not_found(format!("document {document_id}")))?;
        if doc
            .reminders_sent
            .iter()
            .any(|r| r.days_before_expiry == record.days_before_expiry)
        {
            return Ok(false);
        }
        doc.reminders_sent.push(record);
        Ok(true)
    }
}

#[async_trait]
impl WorkerStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Worker> {
        self.workers
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(|| WagekitError::not_found(format!("worker {id}")))
    }
}

/// Notifier double that records every call and can fail per document.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, u32, Vec<String>)>>,
    pub fail_for: Mutex<HashSet<String>>,
}

impl RecordingNotifier {
    pub fn fail_document(&self, id: &str) {
        self.fail_for.lock().unwrap().insert(id.to_string());
    }

    pub fn clear_failures(&self) {
        self.fail_for.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<(String, u32, Vec<String>)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_document_expiry_reminder(
        &self,
        document: &ExpiringDocument,
        _worker: &Worker,
        days_before_expiry: u32,
        recipients: &[String],
    ) -> Result<()> {
        if self.fail_for.lock().unwrap().contains(&document.id) {
            return Err(WagekitError::notify(format!(
                "smtp refused for document {}",
                document.id
            )));
        }
        self.sent.lock().unwrap().push((
            document.id.clone(),
            days_before_expiry,
            recipients.to_vec(),
        ));
        Ok(())
    }
}

pub fn utc_day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

pub fn active_doc(id: &str, expiry: DateTime<Utc>) -> ExpiringDocument {
    ExpiringDocument {
        id: id.to_string(),
        name: format!("Document {id}"),
        worker: WorkerRef::Id("w-1".into()),
        expiry_date: expiry,
        status: DocumentStatus::Active,
        reminder_enabled: true,
        custom_recipients: None,
        reminders_sent: Vec::new(),
    }
}

pub fn default_worker() -> Worker {
    Worker {
        id: "w-1".into(),
        first_name: "Maya".into(),
        last_name: "Tran".into(),
        email: Some("maya@acme.test".into()),
    }
}

pub fn default_settings() -> ReminderSettings {
    ReminderSettings {
        enabled: true,
        reminder_days: vec![30, 7, 3],
        recipients: vec![ReminderRecipient {
            email: "a@x.com".into(),
            active: true,
            notification_types: vec![NotificationType::DocumentExpiry],
        }],
    }
}
