//! Daily reminder scheduler — fires the check routine once a day at a
//! fixed local time.
//!
//! The running timer is an explicit owned resource held by the scheduler,
//! not ambient global state. `stop()` only cancels future triggers; an
//! in-flight run always completes.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, NaiveTime, Utc};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::engine::ReminderEngine;

/// Handle to a running daily timer.
struct TimerHandle {
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

/// Owns the daily timer around a [`ReminderEngine`].
pub struct ReminderScheduler {
    engine: Arc<ReminderEngine>,
    run_at: NaiveTime,
    timer: Mutex<Option<TimerHandle>>,
}

impl ReminderScheduler {
    pub fn new(engine: Arc<ReminderEngine>, run_at: NaiveTime) -> Self {
        Self {
            engine,
            run_at,
            timer: Mutex::new(None),
        }
    }

    /// Start the daily trigger. No-op when already running.
    pub fn start(&self) {
        let mut timer = self.timer.lock().unwrap();
        if timer.as_ref().is_some_and(|t| !t.task.is_finished()) {
            tracing::debug!("Reminder scheduler already running");
            return;
        }

        let engine = self.engine.clone();
        let run_at = self.run_at;
        let shutdown = Arc::new(Notify::new());
        let shutdown_rx = shutdown.clone();

        let task = tokio::spawn(async move {
            loop {
                let wait = next_fire_delay(Local::now(), run_at);
                tracing::debug!("⏰ Next expiry check in {}s", wait.as_secs());
                tokio::select! {
                    _ = shutdown_rx.notified() => break,
                    _ = tokio::time::sleep(wait) => {}
                }
                // An error in one run must never prevent the next one.
                match engine.run_check(Utc::now()).await {
                    Ok(report) => tracing::info!(
                        "⏰ Scheduled expiry check done: {} sent, {} failed",
                        report.sent,
                        report.failed
                    ),
                    Err(e) => {
                        tracing::error!("⚠️ Scheduled expiry check failed: {e}");
                    }
                }
            }
            tracing::info!("⏹ Reminder scheduler stopped");
        });

        tracing::info!("⏰ Reminder scheduler started (daily at {})", self.run_at);
        *timer = Some(TimerHandle { shutdown, task });
    }

    /// Cancel the future trigger. Idempotent; safe when never started.
    /// An in-flight check completes before the loop exits.
    pub fn stop(&self) {
        if let Some(handle) = self.timer.lock().unwrap().take() {
            handle.shutdown.notify_one();
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|t| !t.task.is_finished())
    }
}

/// Time until the next occurrence of `at` (local wall clock).
fn next_fire_delay(now: DateTime<Local>, at: NaiveTime) -> std::time::Duration {
    let today_fire = now.date_naive().and_time(at);
    let next = if now.naive_local() < today_fire {
        today_fire
    } else {
        today_fire + chrono::Duration::days(1)
    };
    (next - now.naive_local()).to_std().unwrap_or_default()
}
