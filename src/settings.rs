use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};
use crate::importer::DEFAULT_BATCH_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_csv_file")]
    pub csv_file: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

fn default_database() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("homefinance")
        .join("homefinance.db")
        .to_string_lossy()
        .to_string()
}

fn default_csv_file() -> String {
    "./research/homefinance_transactions.csv".to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_sample_size() -> usize {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: default_database(),
            csv_file: default_csv_file(),
            batch_size: default_batch_size(),
            sample_size: default_sample_size(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("homefinance")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Missing or unreadable settings fall back to defaults.
pub fn load_settings() -> Settings {
    let path = settings_path();
    match std::fs::read_to_string(&path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    std::fs::create_dir_all(config_dir())?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| ImportError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

impl Settings {
    /// Apply command-line (or environment) overrides on top of the stored settings.
    pub fn with_overrides(mut self, database: Option<String>, csv_file: Option<String>) -> Self {
        if let Some(db) = database {
            self.database = db;
        }
        if let Some(csv) = csv_file {
            self.csv_file = csv;
        }
        self
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(expand_home(&self.database))
    }

    pub fn csv_path(&self) -> PathBuf {
        PathBuf::from(expand_home(&self.csv_file))
    }
}

pub fn expand_home(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            let rest = &path[1..];
            return format!("{}{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}
