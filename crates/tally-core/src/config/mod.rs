//! Configuration management for Tally.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every struct implements `Default`, so a partial file only needs
//! the keys it overrides.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Tally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Classifier graph settings
    pub model: ModelConfig,

    /// Evaluation run settings
    pub evaluation: EvaluationConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Summary report settings
    pub report: ReportConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.tally.tally/config.toml
    /// - Linux: ~/.config/tally/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\tally\config\config.toml
    ///
    /// Falls back to ~/.tally/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "tally", "tally")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".tally").join("config.toml")
            })
    }

    /// Get the resolved model directory path (with ~ expansion).
    pub fn model_dir(&self) -> PathBuf {
        expand(&self.general.model_dir)
    }

    /// Full path of the classifier graph file.
    pub fn model_path(&self) -> PathBuf {
        self.model_dir().join(&self.model.file_name)
    }

    /// Directory that receives summary images and histograms.
    pub fn report_dir(&self) -> PathBuf {
        self.model_dir().join(&self.report.dir_name)
    }

    /// Resolved label file path.
    pub fn label_path(&self) -> PathBuf {
        expand(&self.evaluation.label_path)
    }

    /// Resolved test directory path.
    pub fn test_dir(&self) -> PathBuf {
        expand(&self.evaluation.test_dir)
    }

    /// Resolved result file path.
    pub fn result_path(&self) -> PathBuf {
        expand(&self.evaluation.result_path)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}
