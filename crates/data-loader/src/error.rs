//! Error types for the data-loader crate.
//!
//! Everything that can go wrong between a file on disk and a validated
//! `RatingRecord` is represented here. The recommendation core never sees
//! these errors: by the time records reach it they have been checked.

use thiserror::Error;

/// Errors that can occur while loading, parsing or validating rating data
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A JSON document was structurally invalid
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Line in data file couldn't be parsed
    ///
    /// This variant stores context about where the error occurred
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A rating record handed to the store is structurally invalid
    #[error("Invalid rating record #{index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
