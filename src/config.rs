//! Configuration for the boiler telemetry hub.

use crate::core::range::UnknownRangePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Main configuration. Loaded from disk when present, with CLI flags
/// layered on top by the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Explicit CSV path. When unset, the default candidates are tried.
    pub csv_path: Option<PathBuf>,

    /// Name of the designated time column.
    pub time_column: String,

    /// Restrict ingestion to the calendar day of the first row.
    pub first_day_only: bool,

    /// How to treat range keys outside the closed set.
    pub unknown_range_policy: UnknownRangePolicy,

    /// Port for the HTTP/WebSocket server.
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_path: None,
            time_column: "Time".to_string(),
            first_day_only: false,
            unknown_range_policy: UnknownRangePolicy::default(),
            port: 8080,
        }
    }
}

impl Config {
    /// Load configuration from the default location, or defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("boilerhub")
            .join("config.json")
    }

    /// CSV source candidates in priority order: the configured path if any,
    /// then the conventional locations of the plant export.
    pub fn csv_candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(path) = &self.csv_path {
            candidates.push(path.clone());
        }
        candidates.push(PathBuf::from("data/Boiler11_1.csv"));
        candidates.push(PathBuf::from("Boiler11_1.csv"));
        candidates
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.time_column, "Time");
        assert_eq!(config.port, 8080);
        assert!(!config.first_day_only);
        assert_eq!(config.unknown_range_policy, UnknownRangePolicy::TreatAsAll);
    }

    #[test]
    fn test_explicit_path_takes_priority() {
        let config = Config {
            csv_path: Some(PathBuf::from("/tmp/custom.csv")),
            ..Config::default()
        };
        assert_eq!(config.csv_candidates()[0], PathBuf::from("/tmp/custom.csv"));
        assert_eq!(config.csv_candidates().len(), 3);
    }

    #[test]
    fn test_config_roundtrip_via_json() {
        let config = Config {
            first_day_only: true,
            unknown_range_policy: UnknownRangePolicy::Reject,
            port: 9090,
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert!(parsed.first_day_only);
        assert_eq!(parsed.unknown_range_policy, UnknownRangePolicy::Reject);
        assert_eq!(parsed.port, 9090);
    }
}
