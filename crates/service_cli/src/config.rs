//! CLI configuration management.
//!
//! Handles loading of `incidence.toml` with environment variable overrides
//! (`INCIDENCE_*`). Command line flags override both.

use incidence_core::math::BandwidthRule;
use incidence_metrics::EngineSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::output::OutputFormat;

/// Incidence CLI configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IncidenceConfig {
    /// Survey extract path
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Distribution metric settings
    #[serde(default)]
    pub engine: EngineSettings,

    /// Seed for Lorenz rendering samples
    #[serde(default = "default_sample_seed")]
    pub sample_seed: u64,

    /// Draw a fresh seed for every evaluation instead of `sample_seed`
    #[serde(default)]
    pub reseed: bool,

    /// Relative tolerance when reconciling the loaded baseline column
    #[serde(default = "default_reconcile_tolerance")]
    pub reconcile_tolerance: f64,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/sample_survey.csv")
}

fn default_sample_seed() -> u64 {
    incidence_core::rng::DEFAULT_SAMPLE_SEED
}

fn default_reconcile_tolerance() -> f64 {
    1e-6
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for IncidenceConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            engine: EngineSettings::default(),
            sample_seed: default_sample_seed(),
            reseed: false,
            reconcile_tolerance: default_reconcile_tolerance(),
            format: OutputFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl IncidenceConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides
    pub fn with_env_override(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup; unparsable values are ignored
    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup("INCIDENCE_DATA_PATH") {
            self.data_path = PathBuf::from(path);
        }

        if let Some(seed) = lookup("INCIDENCE_SEED").and_then(|s| s.parse().ok()) {
            self.sample_seed = seed;
        }

        if let Some(reseed) = lookup("INCIDENCE_RESEED").and_then(|s| s.parse().ok()) {
            self.reseed = reseed;
        }

        if let Some(points) = lookup("INCIDENCE_GRID_POINTS").and_then(|s| s.parse().ok()) {
            self.engine.grid_points = points;
        }

        if let Some(points) = lookup("INCIDENCE_LORENZ_POINTS").and_then(|s| s.parse().ok()) {
            self.engine.lorenz_points = points;
        }

        if let Some(rule) = lookup("INCIDENCE_BANDWIDTH") {
            self.engine.bandwidth = match rule.to_lowercase().as_str() {
                "scott" => BandwidthRule::Scott,
                "silverman" => BandwidthRule::Silverman,
                _ => self.engine.bandwidth,
            };
        }

        if let Some(format) = lookup("INCIDENCE_FORMAT").and_then(|s| s.parse().ok()) {
            self.format = format;
        }

        if let Some(log_level) = lookup("INCIDENCE_LOG_LEVEL") {
            self.log_level = log_level;
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, valid_log_levels
            ));
        }

        if self.data_path.as_os_str().is_empty() {
            errors.push("data_path cannot be empty".to_string());
        }

        errors.extend(self.engine.problems());

        if !self.reconcile_tolerance.is_finite() || self.reconcile_tolerance < 0.0 {
            errors.push(format!(
                "reconcile_tolerance must be a non-negative number, got {}",
                self.reconcile_tolerance
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from file (or defaults) with environment overrides and validate
    pub fn load_with_env_and_validate(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(path)?.with_env_override();
        config.validate()?;
        Ok(config)
    }
}

/// Configuration error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error in config file
    #[error("Parse error: {0}")]
    Parse(String),
    /// Validation error
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = IncidenceConfig::default();
        assert_eq!(config.sample_seed, 42);
        assert_eq!(config.engine.grid_points, 1000);
        assert_eq!(config.format, OutputFormat::Table);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = IncidenceConfig::from_toml(
            r#"
            data_path = "survey/geih.csv"
            format = "json"

            [engine]
            bandwidth = "silverman"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_path, PathBuf::from("survey/geih.csv"));
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.engine.bandwidth, BandwidthRule::Silverman);
        assert_eq!(config.engine.grid_points, 1000);
        assert_eq!(config.sample_seed, 42);
    }

    #[test]
    fn test_parse_error() {
        let result = IncidenceConfig::from_toml("sample_seed = \"abc\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_overrides() {
        let config = IncidenceConfig::default().with_overrides(overrides(&[
            ("INCIDENCE_DATA_PATH", "/tmp/x.csv"),
            ("INCIDENCE_SEED", "7"),
            ("INCIDENCE_BANDWIDTH", "Silverman"),
            ("INCIDENCE_FORMAT", "json"),
            ("INCIDENCE_GRID_POINTS", "not-a-number"),
        ]));

        assert_eq!(config.data_path, PathBuf::from("/tmp/x.csv"));
        assert_eq!(config.sample_seed, 7);
        assert_eq!(config.engine.bandwidth, BandwidthRule::Silverman);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.engine.grid_points, 1000);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config =
            IncidenceConfig::load_or_default(Path::new("/nonexistent/incidence.toml")).unwrap();
        assert_eq!(config.data_path, default_data_path());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let config = IncidenceConfig {
            log_level: "loud".to_string(),
            ..IncidenceConfig::default()
        };

        if let Err(ConfigError::Validation(errors)) = config.validate() {
            assert!(errors.iter().any(|e| e.contains("log_level")));
        } else {
            panic!("Expected validation error");
        }
    }

    #[test]
    fn test_validate_multiple_errors() {
        let mut config = IncidenceConfig::default();
        config.data_path = PathBuf::new();
        config.engine.grid_points = 0;
        config.reconcile_tolerance = -1.0;

        if let Err(ConfigError::Validation(errors)) = config.validate() {
            assert_eq!(errors.len(), 3);
        } else {
            panic!("Expected validation error");
        }
    }

    #[test]
    fn test_engine_problems_match_engine_validation() {
        let mut config = IncidenceConfig::default();
        config.engine.grid_points = 1;
        config.engine.lorenz_points = 1;

        if let Err(ConfigError::Validation(errors)) = config.validate() {
            assert_eq!(errors, config.engine.problems());
            assert_eq!(errors.len(), 2);
        } else {
            panic!("Expected validation error");
        }
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::Validation(vec!["Error 1".to_string(), "Error 2".to_string()]);
        assert_eq!(format!("{}", error), "Validation errors: Error 1; Error 2");
    }
}
