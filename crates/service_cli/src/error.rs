//! CLI error types.

use adapter_survey::LoadError;
use incidence_metrics::MetricsError;
use incidence_shock::ShockError;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Survey extract could not be loaded
    #[error("Survey loading error: {0}")]
    Load(#[from] LoadError),

    /// Scenario could not be applied
    #[error("Scenario error: {0}")]
    Shock(#[from] ShockError),

    /// Metrics could not be computed
    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A consistency check failed
    #[error("Check failed: {0}")]
    CheckFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialisation error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
