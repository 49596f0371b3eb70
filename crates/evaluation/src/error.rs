//! Error types for the evaluation crate.
//!
//! Every variant except `Data` is a configuration error: the run stops
//! before (or instead of) producing fold results, and nothing is retried.

use data_loader::DataLoadError;
use thiserror::Error;

/// Errors that abort a cross-validation run
#[derive(Error, Debug)]
pub enum EvaluationError {
    /// The fold fraction is not a number in (0, 1]
    #[error("Invalid fold fraction p = {value}: must be in (0, 1]")]
    InvalidFoldFraction { value: f64 },

    /// floor(p * total) is zero, so no fold could hold anything out
    #[error("Fold fraction p = {fraction} gives a fold size of 0 for {total} records")]
    FoldSizeZero { fraction: f64, total: usize },

    /// A fold would hold out every record, leaving nothing to train on
    #[error("Fold fraction p = {fraction} holds out all {total} records, leaving no training data")]
    EmptyTrainingSet { fraction: f64, total: usize },

    /// A fold index maps outside the record sequence
    #[error("Segment {fold} ({start}:{end}) does not exist for {total} records")]
    SegmentOutOfRange {
        fold: usize,
        start: usize,
        end: usize,
        total: usize,
    },

    /// The similarity list size must be positive
    #[error("Invalid neighbors n = {value}: must be at least 1")]
    InvalidNeighbors { value: usize },

    /// The constant used for missing predictions must be finite
    #[error("Invalid missing-prediction constant {value}: must be a finite number")]
    InvalidMissingPrediction { value: f64 },

    /// The record sequence itself is unusable
    #[error(transparent)]
    Data(#[from] DataLoadError),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, EvaluationError>;
