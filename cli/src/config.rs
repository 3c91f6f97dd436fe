//! Application configuration with TOML file support.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dobverify_utils::LogConfig;
use dobverify_verification::{ExtractorConfig, ScoringConfig, TextSourceConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Configuration for the `dobverify` binary.
///
/// Loaded from a TOML file via [`AppConfig::from_toml_file`]; every field has
/// a default, so an empty file is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the submission database.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub extraction: ExtractorConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub text_source: TextSourceConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./meta")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log: LogConfig::default(),
            extraction: ExtractorConfig::default(),
            scoring: ScoringConfig::default(),
            text_source: TextSourceConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
