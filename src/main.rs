//! # WageKit — Payroll/HR Administration Backend
//!
//! Runs the document-expiry reminder engine: a daily scheduler, a manual
//! trigger, and an on-demand expiry summary, served over a small HTTP
//! gateway.
//!
//! Usage:
//!   wagekit serve                 # Start gateway + daily scheduler
//!   wagekit check                 # Run one expiry check and exit
//!   wagekit summary               # Print the expiry summary and exit

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wagekit_core::WagekitConfig;
use wagekit_reminder::{ReminderEngine, ReminderScheduler, SqliteStore};

#[derive(Parser)]
#[command(name = "wagekit", version, about = "🗂 WageKit — payroll/HR backend with document-expiry reminders")]
struct Cli {
    /// Config file path (default: ~/.wagekit/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP gateway and the daily reminder scheduler.
    Serve {
        /// Override the configured gateway port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run one expiry check now and exit.
    Check,
    /// Print the expiry summary and exit.
    Summary,
}

fn open_store(config: &WagekitConfig) -> Result<Arc<SqliteStore>> {
    let db_path = shellexpand::tilde(&config.store.db_path).to_string();
    Ok(Arc::new(SqliteStore::open(Path::new(&db_path))?))
}

fn build_engine(config: &WagekitConfig, store: Arc<SqliteStore>) -> Arc<ReminderEngine> {
    let notifier = wagekit_notify::from_config(&config.notify);
    Arc::new(ReminderEngine::new(
        store.clone(),
        store.clone(),
        store,
        notifier,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "wagekit=debug,tower_http=debug"
    } else {
        "wagekit=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => WagekitConfig::load_from(Path::new(path))?,
        None => WagekitConfig::load()?,
    };

    match cli.command {
        Command::Serve { port } => {
            let store = open_store(&config)?;
            let engine = build_engine(&config, store.clone());

            let scheduler = if config.scheduler.enabled {
                let run_at = config.scheduler.run_at_time()?;
                let scheduler = Arc::new(ReminderScheduler::new(engine.clone(), run_at));
                scheduler.start();
                Some(scheduler)
            } else {
                tracing::info!("📋 Daily reminder scheduler disabled by config");
                None
            };

            let port = port.unwrap_or(config.gateway.port);
            println!("🗂 WageKit v{}", env!("CARGO_PKG_VERSION"));
            println!("   🌐 Gateway:   http://{}:{port}", config.gateway.host);
            println!("   🗄️  Database:  {}", config.store.db_path);
            println!(
                "   ⏰ Scheduler: {}",
                if config.scheduler.enabled {
                    format!("daily at {}", config.scheduler.run_at)
                } else {
                    "disabled".to_string()
                }
            );
            println!();

            let state = wagekit_gateway::AppState {
                engine,
                documents: store,
                start_time: std::time::Instant::now(),
            };
            let result = wagekit_gateway::serve(state, &config.gateway.host, port).await;

            if let Some(scheduler) = scheduler {
                scheduler.stop();
            }
            result?;
        }
        Command::Check => {
            let store = open_store(&config)?;
            let engine = build_engine(&config, store);
            let report = engine.run_check(Utc::now()).await?;
            println!(
                "✅ Expiry check: {} candidate(s), {} sent, {} skipped, {} failed",
                report.candidates, report.sent, report.skipped, report.failed
            );
        }
        Command::Summary => {
            let store = open_store(&config)?;
            let summary = wagekit_reminder::expiry_summary(store.as_ref(), Utc::now()).await?;
            println!("📊 Document expiry summary:");
            println!("   Expired:        {}", summary.expired.count);
            println!("   Within 3 days:  {}", summary.within_3_days.count);
            println!("   Within 7 days:  {}", summary.within_7_days.count);
            println!("   Within 30 days: {}", summary.within_30_days.count);
        }
    }

    Ok(())
}
