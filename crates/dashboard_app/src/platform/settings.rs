use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dashboard_core::DEFAULT_WEBHOOK_URL;
use dashboard_engine::{write_atomic, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::{LogDestination, LogLevel};

pub const SETTINGS_FILENAME: &str = "dashboard_settings.ron";
pub const WEBHOOK_ENV_VAR: &str = "DASHBOARD_WEBHOOK_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub webhook_url: String,
    pub data_dir: PathBuf,
    pub log_destination: LogDestination,
    pub log_level: LogLevel,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            webhook_url: DEFAULT_WEBHOOK_URL.to_string(),
            data_dir: PathBuf::from("dashboard_data"),
            log_destination: LogDestination::default(),
            log_level: LogLevel::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Read(io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(ron::error::SpannedError),
    #[error("failed to encode settings: {0}")]
    Encode(ron::Error),
    #[error("failed to write settings: {0}")]
    Write(StoreError),
}

/// Reads settings from `path`. A missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<AppSettings, SettingsError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(AppSettings::default()),
        Err(err) => return Err(SettingsError::Read(err)),
    };
    ron::from_str(&content).map_err(SettingsError::Parse)
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> Result<(), SettingsError> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(settings, pretty).map_err(SettingsError::Encode)?;
    write_atomic(path, &content).map_err(SettingsError::Write)
}

/// Applies `DASHBOARD_WEBHOOK_URL` when set to a non-blank value.
pub fn apply_env_overrides(settings: &mut AppSettings, webhook_override: Option<String>) {
    if let Some(url) = webhook_override
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    {
        settings.webhook_url = url;
    }
}
