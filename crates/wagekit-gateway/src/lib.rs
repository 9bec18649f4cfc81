//! # WageKit Gateway
//!
//! Thin HTTP surface over the reminder engine: health, manual trigger,
//! and the on-demand expiry summary.

pub mod routes;
pub mod server;

pub use server::{AppState, build_router, serve};
