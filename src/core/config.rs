//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the per-bundle configuration, looked up in the input directory
pub const LOCAL_CONFIG_FILE: &str = ".isaslice.yaml";

/// Default columns combined into variable names
pub const DEFAULT_AXIS_COLUMNS: [&str; 2] = ["mass_to_charge", "retention_time"];

/// isaslice configuration with layered hierarchy
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// Log level used when neither `-q`/`-v` nor `ISASLICE_LOG` is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Extra cell tokens read as missing values (e.g. `NA`, `n/a`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_values: Option<Vec<String>>,

    /// Columns joined into variable names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_columns: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(input_dir: Option<&Path>) -> Self {
        let mut config = Config::default();

        // 1. Global user config (~/.config/isaslice/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 2. Bundle config (<input>/.isaslice.yaml)
        if let Some(dir) = input_dir {
            if let Some(local) = Self::read_file(&dir.join(LOCAL_CONFIG_FILE)) {
                config.merge(local);
            }
        }

        // 3. Environment variables
        if let Ok(format) = std::env::var("ISASLICE_FORMAT") {
            config.default_format = Some(format);
        }
        if let Ok(level) = std::env::var("ISASLICE_LOG_LEVEL") {
            config.log_level = Some(level);
        }

        config
    }

    /// Unreadable or invalid files are skipped
    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "isaslice")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
        if other.missing_values.is_some() {
            self.missing_values = other.missing_values;
        }
        if other.axis_columns.is_some() {
            self.axis_columns = other.axis_columns;
        }
    }

    pub fn missing_values(&self) -> Vec<String> {
        self.missing_values.clone().unwrap_or_default()
    }

    pub fn axis_columns(&self) -> Vec<String> {
        self.axis_columns
            .clone()
            .unwrap_or_else(|| DEFAULT_AXIS_COLUMNS.iter().map(|c| c.to_string()).collect())
    }
}
