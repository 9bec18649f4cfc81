//! HTTP server implementation using Axum.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use wagekit_core::error::{Result, WagekitError};
use wagekit_core::traits::DocumentStore;
use wagekit_reminder::ReminderEngine;

/// Shared state for the gateway server.
#[derive(Clone)]
pub struct AppState {
    /// The reminder engine — backs the manual trigger endpoint.
    pub engine: Arc<ReminderEngine>,
    /// Document store — backs the expiry summary endpoint.
    pub documents: Arc<dyn DocumentStore>,
    pub start_time: std::time::Instant,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(super::routes::health_check))
        .route("/api/v1/reminders/check", post(super::routes::trigger_check))
        .route(
            "/api/v1/documents/expiry-summary",
            get(super::routes::expiry_summary),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Bind and serve the gateway until the process exits.
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| WagekitError::config(format!("Bind {addr}: {e}")))?;
    tracing::info!("🌐 Gateway listening on http://{addr}");
    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| WagekitError::config(format!("Serve: {e}")))?;
    Ok(())
}
