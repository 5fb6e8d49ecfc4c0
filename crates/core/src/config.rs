use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    profiled_env_opt(profile, key)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub workbook: WorkbookConfig,
    pub smtp: SmtpConfig,
    pub alerts: AlertsConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `STOCKMON_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("STOCKMON_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            workbook: WorkbookConfig::from_env_profiled(p),
            smtp: SmtpConfig::from_env_profiled(p),
            alerts: AlertsConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  workbook:    dir={}, url={}",
            self.workbook.dir.display(),
            self.workbook.url.as_deref().unwrap_or("(manifest)")
        );
        tracing::info!(
            "  smtp:        host={}, port={}, tls={}",
            self.smtp.host.as_deref().unwrap_or("(none)"),
            self.smtp.port,
            self.smtp.tls
        );
        tracing::info!(
            "  alerts:      recipient={}, definitions={}",
            self.alerts.recipient.as_deref().unwrap_or("(none)"),
            self.alerts
                .definitions_dir
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "(none)".to_string())
        );
    }

    /// Return a redacted view safe for printing (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "workbook": { "dir": self.workbook.dir, "url": self.workbook.url },
            "smtp": {
                "host": self.smtp.host,
                "port": self.smtp.port,
                "tls": self.smtp.tls,
                "from": self.smtp.from,
                "configured": self.smtp.is_configured(),
            },
            "alerts": {
                "recipient": self.alerts.recipient,
                "definitions_dir": self.alerts.definitions_dir,
            },
        })
    }
}

// ── Workbook ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbookConfig {
    /// Directory holding the CSV sheet exports.
    pub dir: PathBuf,
    /// Spreadsheet URL override for row links.
    pub url: Option<String>,
}

impl WorkbookConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            dir: PathBuf::from(profiled_env_or(p, "STOCKMON_WORKBOOK_DIR", "data")),
            url: profiled_env_opt(p, "STOCKMON_SPREADSHEET_URL"),
        }
    }
}

// ── SMTP ──────────────────────────────────────────────────────

/// SMTP relay settings. Credentials stay in `SMTP_USERNAME` / `SMTP_PASSWORD`
/// and are read by the notifier directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub tls: bool,
    pub from: Option<String>,
}

impl SmtpConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_opt(p, "SMTP_HOST"),
            port: profiled_env_u16(p, "SMTP_PORT", 587),
            tls: profiled_env_bool(p, "SMTP_TLS", true),
            from: profiled_env_opt(p, "SMTP_FROM"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.host.is_some() && self.from.is_some()
    }
}

// ── Alerts ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// Mail recipient for the built-in alerts.
    pub recipient: Option<String>,
    /// Directory of YAML alert definitions.
    pub definitions_dir: Option<PathBuf>,
}

impl AlertsConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            recipient: profiled_env_opt(p, "STOCKMON_RECIPIENT"),
            definitions_dir: profiled_env_opt(p, "STOCKMON_DEFINITIONS_DIR").map(PathBuf::from),
        }
    }
}
