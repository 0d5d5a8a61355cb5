// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_INTERVAL_MS: u64 = 1000;

/// Retry policy applied by the HTTP resolver.
///
/// Typically loaded from the engine's YAML configuration:
///
/// ```yaml
/// max_attempts: 3
/// retry_interval_ms: 1000
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FetchConfig {
    /// Total number of attempts, including the first one. Must be >= 1.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Pause between attempts, in milliseconds.
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_retry_interval_ms() -> u64 {
    DEFAULT_RETRY_INTERVAL_MS
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_interval_ms: DEFAULT_RETRY_INTERVAL_MS,
        }
    }
}

impl FetchConfig {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load and validate a fetch configuration from a YAML file.
pub fn load_fetch_config<P: AsRef<Path>>(path: P) -> Result<FetchConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: FetchConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let yaml = "max_attempts: 5\nretry_interval_ms: 250\n";
        let config: FetchConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.retry_interval(), Duration::from_millis(250));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: FetchConfig = serde_yaml::from_str("{}").unwrap();

        assert_eq!(config, FetchConfig::default());
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_interval_ms, 1000);
    }

    #[test]
    fn zero_attempts_is_invalid() {
        let config = FetchConfig { max_attempts: 0, retry_interval_ms: 100 };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_from_file_and_validate() {
        let temp_dir = std::env::temp_dir();
        let temp_file = temp_dir.join("printgraph_fetch_config.yaml");
        std::fs::write(&temp_file, "max_attempts: 2\n").unwrap();

        let config = load_fetch_config(&temp_file).unwrap();
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.retry_interval_ms, 1000);

        std::fs::remove_file(&temp_file).unwrap();
    }

    #[test]
    fn load_rejects_invalid_file() {
        let temp_dir = std::env::temp_dir();
        let temp_file = temp_dir.join("printgraph_fetch_config_invalid.yaml");
        std::fs::write(&temp_file, "max_attempts: 0\n").unwrap();

        let result = load_fetch_config(&temp_file);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        std::fs::remove_file(&temp_file).unwrap();
    }
}
