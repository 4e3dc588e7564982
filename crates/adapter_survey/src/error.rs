//! Survey loading error types.

use incidence_core::types::StatsError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a survey extract.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened.
    #[error("Failed to open {path}: {source}")]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV could not be read or a record could not be decoded.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is empty.
    #[error("Line {line}: missing required field {column}")]
    MissingField {
        /// Line number in the file, header included.
        line: usize,
        /// Column name.
        column: &'static str,
    },

    /// A required column holds a value that cannot be parsed.
    #[error("Line {line}: invalid value '{value}' for {column}")]
    InvalidField {
        /// Line number in the file, header included.
        line: usize,
        /// Column name.
        column: &'static str,
        /// Raw value.
        value: String,
    },

    /// The file has a header but no records.
    #[error("No records in survey extract")]
    NoRecords,

    /// The records do not form a valid member table.
    #[error("Invalid member table: {0}")]
    Table(#[from] StatsError),
}
