//! Metrics error types.

use incidence_core::types::StatsError;
use incidence_shock::ShockError;
use thiserror::Error;

/// Errors that can occur while computing distribution metrics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// An income column does not line up with the member table.
    #[error("Misaligned columns: expected {expected} rows, got {actual}")]
    MisalignedColumns {
        /// Rows in the member table.
        expected: usize,
        /// Rows in the income column.
        actual: usize,
    },

    /// A Lorenz sample was drawn for a curve of another length.
    #[error("Sample drawn for {expected} points applied to a curve of {actual} points")]
    SampleMismatch {
        /// Curve length the sample was drawn for.
        expected: usize,
        /// Length of the curve it was applied to.
        actual: usize,
    },

    /// Engine settings are out of range.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Underlying statistics error.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Error applying the shock scenario.
    #[error(transparent)]
    Shock(#[from] ShockError),
}
