//! User settings for Cashbook
//!
//! Display and logging preferences persisted as `config.json`.

use serde::{Deserialize, Serialize};

use super::paths::CashbookPaths;
use crate::error::CashbookError;

/// User settings for Cashbook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Date format used when printing transactions (strftime format).
    /// CSV files always use `%Y-%m-%d`.
    #[serde(default = "default_display_date_format")]
    pub display_date_format: String,

    /// `tracing` filter directive used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Whether mutations are appended to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_display_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            display_date_format: default_display_date_format(),
            log_filter: default_log_filter(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &CashbookPaths) -> Result<Self, CashbookError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| CashbookError::file("read", &settings_path, e))?;

        serde_json::from_str(&contents)
            .map_err(|e| CashbookError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CashbookPaths) -> Result<(), CashbookError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| CashbookError::Config(format!("Failed to serialize settings: {}", e)))?;

        let settings_path = paths.settings_file();
        std::fs::write(&settings_path, contents)
            .map_err(|e| CashbookError::file("write", &settings_path, e))?;

        Ok(())
    }
}
