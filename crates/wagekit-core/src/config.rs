//! WageKit configuration system.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, WagekitError};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WagekitConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl WagekitConfig {
    /// Load config from the default path (~/.wagekit/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WagekitError::config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| WagekitError::config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| WagekitError::config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the WageKit home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".wagekit")
    }
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8710
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Daily reminder scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
    /// Fixed local time of day the check fires, "HH:MM".
    #[serde(default = "default_run_at")]
    pub run_at: String,
}

fn bool_true() -> bool {
    true
}
fn default_run_at() -> String {
    "07:00".into()
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            run_at: default_run_at(),
        }
    }
}

impl SchedulerConfig {
    /// Parse `run_at` into a time of day.
    pub fn run_at_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.run_at, "%H:%M")
            .map_err(|e| WagekitError::config(format!("Invalid scheduler.run_at '{}': {e}", self.run_at)))
    }
}

/// SQLite store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    "~/.wagekit/wagekit.db".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Notification backend selection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NotifyBackend {
    /// Log-only delivery, for development.
    #[default]
    Log,
    Email,
    Webhook,
}

/// Notification configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub backend: NotifyBackend,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
}

/// SMTP sender configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub from_email: String,
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default)]
    pub password: String,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".into()
}
fn default_smtp_port() -> u16 {
    587
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            from_email: String::new(),
            from_name: None,
            password: String::new(),
        }
    }
}

/// Outbound webhook configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = WagekitConfig::default();
        assert_eq!(cfg.gateway.port, 8710);
        assert!(cfg.scheduler.enabled);
        assert_eq!(cfg.scheduler.run_at, "07:00");
        assert_eq!(cfg.notify.backend, NotifyBackend::Log);
    }

    #[test]
    fn test_run_at_parse() {
        let cfg = SchedulerConfig {
            enabled: true,
            run_at: "06:30".into(),
        };
        let t = cfg.run_at_time().unwrap();
        assert_eq!(t, NaiveTime::from_hms_opt(6, 30, 0).unwrap());

        let bad = SchedulerConfig {
            enabled: true,
            run_at: "late".into(),
        };
        assert!(bad.run_at_time().is_err());
    }

    #[test]
    fn test_parse_partial_toml() {
        let cfg: WagekitConfig = toml::from_str(
            r#"
            [scheduler]
            run_at = "05:15"

            [notify]
            backend = "email"

            [notify.email]
            from_email = "payroll@acme.test"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.scheduler.run_at, "05:15");
        assert_eq!(cfg.notify.backend, NotifyBackend::Email);
        assert_eq!(cfg.notify.email.from_email, "payroll@acme.test");
        assert_eq!(cfg.notify.email.smtp_port, 587);
        assert_eq!(cfg.gateway.host, "0.0.0.0");
    }
}
