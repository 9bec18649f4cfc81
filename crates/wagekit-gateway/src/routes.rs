//! API route handlers for the gateway.

use axum::{Json, extract::State};
use chrono::Utc;
use std::sync::Arc;

use super::server::AppState;

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "wagekit-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Manual trigger — runs the same check routine the daily timer invokes,
/// synchronously, and returns the run report.
pub async fn trigger_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    match state.engine.run_check(Utc::now()).await {
        Ok(report) => Json(serde_json::json!({
            "ok": true,
            "message": format!(
                "Expiry check complete: {} sent, {} skipped, {} failed",
                report.sent, report.skipped, report.failed
            ),
            "report": report,
        })),
        Err(e) => Json(serde_json::json!({
            "ok": false,
            "error": e.to_string(),
        })),
    }
}

/// Expiry summary — horizon-bucketed counts plus the underlying records.
pub async fn expiry_summary(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    match wagekit_reminder::expiry_summary(state.documents.as_ref(), Utc::now()).await {
        Ok(summary) => Json(serde_json::json!({
            "ok": true,
            "counts": {
                "expired": summary.expired.count,
                "within_3_days": summary.within_3_days.count,
                "within_7_days": summary.within_7_days.count,
                "within_30_days": summary.within_30_days.count,
            },
            "summary": summary,
        })),
        Err(e) => Json(serde_json::json!({
            "ok": false,
            "error": e.to_string(),
        })),
    }
}
