use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

use crate::ConfigError;

/// Environment variable that relocates the whole tracker home.
pub const HOME_ENV: &str = "SUBTRACK_HOME";
const APP_DIR: &str = "subtrack";

/// User preferences for the tracker and its shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Currency assigned to new subscriptions when none is given.
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default = "Config::default_upcoming_window_days")]
    pub upcoming_window_days: u32,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the subscription collection.
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: Self::default_currency(),
            upcoming_window_days: Self::default_upcoming_window_days(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            backup_retention: Self::default_backup_retention(),
            data_root: None,
        }
    }
}

impl Config {
    pub fn default_currency() -> String {
        "USD".into()
    }

    pub fn default_upcoming_window_days() -> u32 {
        30
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    /// Directory holding the collection blob and its backups.
    pub fn resolve_data_root(&self) -> PathBuf {
        match &self.data_root {
            Some(path) => path.clone(),
            None => default_data_root(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let currency = self.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidValue {
                key: "currency",
                value: self.currency.clone(),
            });
        }
        if self.backup_retention == 0 {
            return Err(ConfigError::InvalidValue {
                key: "backup_retention",
                value: self.backup_retention.to_string(),
            });
        }
        Ok(())
    }
}

/// `$SUBTRACK_HOME`, else `<data_dir>/subtrack`, else `~/subtrack`, else `./subtrack`.
pub fn default_data_root() -> PathBuf {
    if let Some(home) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(home);
    }
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(APP_DIR)
}
