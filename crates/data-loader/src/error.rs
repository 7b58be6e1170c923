//! Error types for the data-loader crate.
//!
//! Loading the raw TMDB tables is the only place this crate can fail.
//! Malformed structured-list cells are *not* errors here: they are carried
//! through as opaque strings and degrade to empty lists later in the pipeline.

use thiserror::Error;

/// Errors that can occur while reading and joining the raw tables
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected the file (bad quoting, truncated record, ...)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row couldn't be turned into a record
    ///
    /// `line` is the 1-based line in the source file, header included.
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A required column is missing from the header row
    #[error("Missing column '{column}' in {file}")]
    MissingColumn { file: String, column: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
