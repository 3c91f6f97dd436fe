//! Structured logging initialization via `tracing`.
//!
//! Logging is set up once by the binary. Library crates only emit events
//! through `tracing` macros or an injected observer, never configure output.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

/// Logging settings, usually taken from the `[log]` part of the app config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `"info"`.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Also append log lines to this file (stdout is always written).
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::Human,
            file: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter {0:?}: {1}")]
    Filter(String, String),

    #[error("cannot open log file {0}: {1}")]
    File(PathBuf, std::io::Error),

    #[error("a global subscriber is already installed")]
    AlreadyInitialized,
}

/// Build the filter: `RUST_LOG` wins, otherwise the configured level.
fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| LoggingError::Filter(level.to_string(), e.to_string())),
    }
}

/// Initialize the tracing subscriber.
///
/// Writes to stdout, and additionally to `config.file` when set (parent
/// directories are created). Respects the `RUST_LOG` environment variable.
pub fn init_tracing(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = build_filter(&config.level)?;

    let file = match &config.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| LoggingError::File(path.clone(), e))?;
            }
            let f = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| LoggingError::File(path.clone(), e))?;
            Some(f)
        }
        None => None,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match (config.format, file) {
        (LogFormat::Human, None) => builder.try_init(),
        (LogFormat::Json, None) => builder.json().try_init(),
        (LogFormat::Human, Some(f)) => builder
            .with_ansi(false)
            .with_writer(std::io::stdout.and(Mutex::new(f)))
            .try_init(),
        (LogFormat::Json, Some(f)) => builder
            .json()
            .with_writer(std::io::stdout.and(Mutex::new(f)))
            .try_init(),
    };
    result.map_err(|_| LoggingError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_filter_is_reported() {
        // Only meaningful when RUST_LOG does not override the configured level.
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(matches!(
                build_filter("dobverify=notalevel"),
                Err(LoggingError::Filter(_, _))
            ));
        }
    }

    #[test]
    fn unopenable_log_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            level: "info".to_string(),
            format: LogFormat::Human,
            file: Some(dir.path().to_path_buf()),
        };
        assert!(matches!(init_tracing(&config), Err(LoggingError::File(..))));
    }

    #[test]
    fn log_config_defaults() {
        let cfg = LogConfig::default();
        assert_eq!(cfg.level, "info");
        assert_eq!(cfg.format, LogFormat::Human);
        assert!(cfg.file.is_none());
    }
}
