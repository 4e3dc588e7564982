//! Error types for structured error handling.
//!
//! This module provides `StatsError`, raised by the weighted statistics,
//! kernel density and member table operations.

use thiserror::Error;

/// Categorised statistics errors.
///
/// # Variants
/// - `EmptyDistribution`: No observations, or observations with zero total weight
/// - `LengthMismatch`: Values and weights of different lengths
/// - `InvalidWeight`: Negative, zero (where positive is required) or non-finite weight
/// - `NonFiniteValue`: NaN or infinite observation
/// - `InvalidHouseholdSize`: Household with fewer than one person
/// - `DegenerateBandwidth`: Kernel bandwidth could not be selected
/// - `InvalidGrid`: Evaluation grid with no points or a reversed range
///
/// # Examples
/// ```
/// use incidence_core::types::StatsError;
///
/// let err = StatsError::EmptyDistribution("no observations".to_string());
/// assert_eq!(format!("{}", err), "Empty distribution: no observations");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// No observations or zero total weight.
    #[error("Empty distribution: {0}")]
    EmptyDistribution(String),

    /// Values and weights have different lengths.
    #[error("Length mismatch: {values} values but {weights} weights")]
    LengthMismatch {
        /// Number of values
        values: usize,
        /// Number of weights
        weights: usize,
    },

    /// Weight is negative or not finite.
    #[error("Invalid weight at index {index}: {value}")]
    InvalidWeight {
        /// Position of the offending weight
        index: usize,
        /// The weight itself
        value: f64,
    },

    /// Observation is NaN or infinite.
    #[error("Non-finite value at index {index}: {value}")]
    NonFiniteValue {
        /// Position of the offending value
        index: usize,
        /// The value itself
        value: f64,
    },

    /// Household declares fewer than one person.
    #[error("Invalid household size at index {index}: {value}")]
    InvalidHouseholdSize {
        /// Position of the offending member
        index: usize,
        /// Declared persons in household
        value: u32,
    },

    /// Kernel bandwidth is zero or undefined.
    #[error("Degenerate bandwidth: {0}")]
    DegenerateBandwidth(String),

    /// Evaluation grid cannot be built.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
}
