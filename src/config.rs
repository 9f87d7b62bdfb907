//! Centralized configuration management for resume-tui

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::models::TemplateVariant;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database holding the autosave slot
    pub database_path: PathBuf,
    /// Template tag selected when the editor opens
    pub default_template: TemplateVariant,
    /// Log file used while the interactive editor owns the terminal
    pub log_file: PathBuf,
    /// Maximum number of suggestion rows drawn under a field
    pub suggestion_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("./resume_tui.db"),
            default_template: TemplateVariant::Template1,
            log_file: PathBuf::from("resume_tui.log"),
            suggestion_limit: 8,
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let database_path = std::env::var("RESUME_TUI_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let default_template = std::env::var("RESUME_TUI_TEMPLATE")
            .map(|tag| TemplateVariant::from_tag(&tag))
            .unwrap_or(defaults.default_template);

        let log_file = std::env::var("RESUME_TUI_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file);

        let suggestion_limit =
            parse_env_var("RESUME_TUI_SUGGESTION_LIMIT")?.unwrap_or(defaults.suggestion_limit);

        Ok(Config {
            database_path,
            default_template,
            log_file,
            suggestion_limit,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(parent) = self.database_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(anyhow::anyhow!(
                    "Database parent directory does not exist: {}",
                    parent.display()
                ));
            }
        }

        if self.suggestion_limit == 0 {
            return Err(anyhow::anyhow!("RESUME_TUI_SUGGESTION_LIMIT must be at least 1"));
        }

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}
