//! SQLite-backed settings/document/worker stores.
//!
//! Nested lists (`reminders_sent`, `custom_recipients`) are JSON columns;
//! dates are RFC3339 text, which compares correctly for UTC timestamps.

use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use wagekit_core::error::{Result, WagekitError};
use wagekit_core::traits::{DocumentStore, SettingsStore, WorkerStore};
use wagekit_core::types::{
    DocumentFilter, DocumentStatus, ExpiringDocument, ReminderRecord, ReminderSettings,
    SystemContext, Worker, WorkerRef,
};

/// Settings-store key the reminder configuration lives under.
pub const REMINDER_SETTINGS_KEY: &str = "document-expiry-reminders";

/// SQLite store implementing all three collaborator contracts.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .map_err(|e| WagekitError::store(format!("DB open: {e}")))?;
        // WAL for concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL;").ok();
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database (tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| WagekitError::store(format!("DB open: {e}")))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS workers (
                id TEXT PRIMARY KEY,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                email TEXT
            );

            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL DEFAULT '',
                worker_id TEXT NOT NULL,
                expiry_date TEXT NOT NULL,               -- RFC3339
                status TEXT NOT NULL DEFAULT 'active',
                reminder_enabled INTEGER NOT NULL DEFAULT 1,
                custom_recipients TEXT,                  -- JSON array, NULL when unset
                reminders_sent TEXT NOT NULL DEFAULT '[]' -- JSON array of dedup records
            );

            CREATE INDEX IF NOT EXISTS idx_documents_expiry ON documents(expiry_date);
            ",
        )
        .map_err(|e| WagekitError::store(format!("Migration: {e}")))?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| WagekitError::store(format!("Lock: {e}")))
    }

    /// Store the reminder settings (used by the platform's settings CRUD).
    pub fn put_reminder_settings(&self, settings: &ReminderSettings) -> Result<()> {
        let value = serde_json::to_string(settings)
            .map_err(|e| WagekitError::store(format!("Serialize settings: {e}")))?;
        self.lock()?
            .execute(
                "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![REMINDER_SETTINGS_KEY, value],
            )
            .map_err(|e| WagekitError::store(format!("Save settings: {e}")))?;
        Ok(())
    }

    pub fn upsert_worker(&self, worker: &Worker) -> Result<()> {
        self.lock()?
            .execute(
                "INSERT OR REPLACE INTO workers (id, first_name, last_name, email)
                 VALUES (?1, ?2, ?3, ?4)",
                params![worker.id, worker.first_name, worker.last_name, worker.email],
            )
            .map_err(|e| WagekitError::store(format!("Save worker: {e}")))?;
        Ok(())
    }

    pub fn upsert_document(&self, doc: &ExpiringDocument) -> Result<()> {
        let worker_id = match &doc.worker {
            WorkerRef::Id(id) => id.clone(),
            WorkerRef::Embedded(w) => w.id.clone(),
        };
        let custom = doc
            .custom_recipients
            .as_ref()
            .map(|c| serde_json::to_string(c))
            .transpose()
            .map_err(|e| WagekitError::store(format!("Serialize recipients: {e}")))?;
        let sent = serde_json::to_string(&doc.reminders_sent)
            .map_err(|e| WagekitError::store(format!("Serialize reminders: {e}")))?;
        self.lock()?
            .execute(
                "INSERT OR REPLACE INTO documents
                 (id, name, worker_id, expiry_date, status, reminder_enabled, custom_recipients, reminders_sent)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    doc.id,
                    doc.name,
                    worker_id,
                    doc.expiry_date.to_rfc3339(),
                    doc.status.as_str(),
                    doc.reminder_enabled as i32,
                    custom,
                    sent,
                ],
            )
            .map_err(|e| WagekitError::store(format!("Save document: {e}")))?;
        Ok(())
    }

    pub fn get_document(&self, id: &str) -> Result<ExpiringDocument> {
        let row = self
            .lock()?
            .query_row(
                "SELECT id, name, worker_id, expiry_date, status, reminder_enabled,
                        custom_recipients, reminders_sent
                 FROM documents WHERE id = ?1",
                [id],
                document_row,
            )
            .optional()
            .map_err(|e| WagekitError::store(format!("Get document: {e}")))?;
        match row {
            Some(raw) => raw.into_document(),
            None => Err(WagekitError::not_found(format!("document {id}"))),
        }
    }
}

/// Raw document row; status/date validation happens in `into_document`.
struct DocumentRow {
    id: String,
    name: String,
    worker_id: String,
    expiry_date: String,
    status: String,
    reminder_enabled: bool,
    custom_recipients: Option<String>,
    reminders_sent: String,
}

fn document_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRow> {
    Ok(DocumentRow {
        id: row.get(0)?,
        name: row.get(1)?,
        worker_id: row.get(2)?,
        expiry_date: row.get(3)?,
        status: row.get(4)?,
        reminder_enabled: row.get::<_, i32>(5)? != 0,
        custom_recipients: row.get(6)?,
        reminders_sent: row.get(7)?,
    })
}

impl DocumentRow {
    fn into_document(self) -> Result<ExpiringDocument> {
        let expiry_date = DateTime::parse_from_rfc3339(&self.expiry_date)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| {
                WagekitError::invalid(format!("expiry_date on document {}: {e}", self.id))
            })?;
        let status = DocumentStatus::from_str(&self.status)?;
        let custom_recipients = self
            .custom_recipients
            .as_deref()
            .map(serde_json::from_str::<Vec<String>>)
            .transpose()
            .map_err(|e| {
                WagekitError::invalid(format!("custom_recipients on document {}: {e}", self.id))
            })?;
        let reminders_sent: Vec<ReminderRecord> = serde_json::from_str(&self.reminders_sent)
            .map_err(|e| {
                WagekitError::invalid(format!("reminders_sent on document {}: {e}", self.id))
            })?;
        Ok(ExpiringDocument {
            id: self.id,
            name: self.name,
            worker: WorkerRef::Id(self.worker_id),
            expiry_date,
            status,
            reminder_enabled: self.reminder_enabled,
            custom_recipients,
            reminders_sent,
        })
    }
}

#[async_trait]
impl SettingsStore for SqliteStore {
    async fn reminder_settings(&self) -> Result<Option<ReminderSettings>> {
        let value: Option<String> = self
            .lock()?
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                [REMINDER_SETTINGS_KEY],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| WagekitError::store(format!("Get settings: {e}")))?;
        value
            .map(|v| {
                serde_json::from_str(&v)
                    .map_err(|e| WagekitError::invalid(format!("reminder settings: {e}")))
            })
            .transpose()
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<ExpiringDocument>> {
        let mut sql = String::from(
            "SELECT id, name, worker_id, expiry_date, status, reminder_enabled,
                    custom_recipients, reminders_sent
             FROM documents WHERE 1=1",
        );
        let mut args: Vec<String> = Vec::new();
        if let Some(from) = filter.expires_from {
            sql.push_str(&format!(" AND expiry_date >= ?{}", args.len() + 1));
            args.push(from.to_rfc3339());
        }
        if let Some(before) = filter.expires_before {
            sql.push_str(&format!(" AND expiry_date < ?{}", args.len() + 1));
            args.push(before.to_rfc3339());
        }
        if let Some(through) = filter.expires_through {
            sql.push_str(&format!(" AND expiry_date <= ?{}", args.len() + 1));
            args.push(through.to_rfc3339());
        }
        if let Some(excluded) = filter.exclude_status {
            sql.push_str(&format!(" AND status != ?{}", args.len() + 1));
            args.push(excluded.as_str().to_string());
        }
        if let Some(enabled) = filter.reminder_enabled {
            sql.push_str(&format!(" AND reminder_enabled = {}", i32::from(enabled)));
        }
        sql.push_str(" ORDER BY expiry_date");

        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| WagekitError::store(format!("Find documents: {e}")))?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(args.iter()), document_row)
            .map_err(|e| WagekitError::store(format!("Find documents: {e}")))?;

        let mut out = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| WagekitError::store(format!("Find documents: {e}")))?;
            out.push(raw.into_document()?);
        }
        Ok(out)
    }

    async fn append_reminder(
        &self,
        document_id: &str,
        record: ReminderRecord,
        _ctx: &SystemContext,
    ) -> Result<bool> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| WagekitError::store(format!("Append reminder: {e}")))?;

        let current: Option<String> = tx
            .query_row(
                "SELECT reminders_sent FROM documents WHERE id = ?1",
                [document_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| WagekitError::store(format!("Append reminder: {e}")))?;
        let Some(current) = current else {
            return Err(WagekitError::not_found(format!("document {document_id}")));
        };

        let mut records: Vec<ReminderRecord> = serde_json::from_str(&current).map_err(|e| {
            WagekitError::invalid(format!("reminders_sent on document {document_id}: {e}"))
        })?;
        // Append only if no entry for this threshold exists yet.
        if records
            .iter()
            .any(|r| r.days_before_expiry == record.days_before_expiry)
        {
            return Ok(false);
        }
        records.push(record);

        let updated = serde_json::to_string(&records)
            .map_err(|e| WagekitError::store(format!("Serialize reminders: {e}")))?;
        tx.execute(
            "UPDATE documents SET reminders_sent = ?1 WHERE id = ?2",
            params![updated, document_id],
        )
        .map_err(|e| WagekitError::store(format!("Append reminder: {e}")))?;
        tx.commit()
            .map_err(|e| WagekitError::store(format!("Append reminder: {e}")))?;
        Ok(true)
    }
}

#[async_trait]
impl WorkerStore for SqliteStore {
    async fn get(&self, id: &str) -> Result<Worker> {
        self.lock()?
            .query_row(
                "SELECT id, first_name, last_name, email FROM workers WHERE id = ?1",
                [id],
                |row| {
                    Ok(Worker {
                        id: row.get(0)?,
                        first_name: row.get(1)?,
                        last_name: row.get(2)?,
                        email: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(|e| WagekitError::store(format!("Get worker: {e}")))?
            .ok_or_else(|| WagekitError::not_found(format!("worker {id}")))
    }
}
