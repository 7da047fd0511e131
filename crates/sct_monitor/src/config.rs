//! Monitor configuration, stored as RON next to the working directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sct_feed::SourceSettings;
use sct_logging::LogDestination;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILENAME: &str = ".sct_monitor.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogTarget {
    File,
    #[default]
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Delay before each simulated delivery.
    pub delivery_interval_ms: u64,
    /// Stop once the backlog is empty and nothing arrived for this long.
    pub idle_timeout_ms: u64,
    pub log_destination: LogTarget,
    pub log_level: String,
    pub log_file: PathBuf,
    pub export_filename: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            delivery_interval_ms: 0,
            idle_timeout_ms: 2000,
            log_destination: LogTarget::Terminal,
            log_level: "info".to_string(),
            log_file: PathBuf::from("./sct_monitor.log"),
            export_filename: "console.log".to_string(),
        }
    }
}

impl MonitorConfig {
    pub fn source_settings(&self) -> SourceSettings {
        SourceSettings {
            delivery_interval: Duration::from_millis(self.delivery_interval_ms),
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Load the config; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<MonitorConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(MonitorConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
