//! Cross-validation configuration.

use crate::error::{EvaluationError, Result};
use data_loader::PreferenceStore;
use serde::{Deserialize, Serialize};

/// What to predict for a held-out record whose item does not appear in the
/// actor's recommendation list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum MissingPrediction {
    /// Leave the record out of the fold's error sum and its denominator
    #[default]
    Skip,
    /// Predict the actor's mean training rating, or the training set's
    /// global mean for an actor with no training ratings
    ActorMean,
    /// Predict a fixed value
    Constant(f64),
}

impl MissingPrediction {
    /// Fallback prediction for `actor`, `None` when the record is to be skipped
    pub fn fallback(&self, training: &PreferenceStore, actor: &str) -> Option<f64> {
        match *self {
            MissingPrediction::Skip => None,
            MissingPrediction::ActorMean => training
                .mean_rating(actor)
                .or_else(|| training.global_mean()),
            MissingPrediction::Constant(value) => Some(value),
        }
    }
}

/// Settings for a k-fold run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Share of the records held out per fold, in (0, 1]
    pub fold_fraction: f64,
    /// Neighbours kept per item in the similarity index
    pub neighbors: usize,
    pub missing_prediction: MissingPrediction,
    /// Evaluate folds on the Rayon thread pool
    pub parallel: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            fold_fraction: 0.1,
            neighbors: 10,
            missing_prediction: MissingPrediction::Skip,
            parallel: false,
        }
    }
}

impl EvaluationConfig {
    pub fn new(fold_fraction: f64) -> Self {
        Self {
            fold_fraction,
            ..Self::default()
        }
    }

    /// Configure neighbours per item (default: 10)
    pub fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }

    /// Configure the missing-prediction policy (default: Skip)
    pub fn with_missing_prediction(mut self, policy: MissingPrediction) -> Self {
        self.missing_prediction = policy;
        self
    }

    /// Evaluate folds in parallel (default: false)
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Reject settings that would corrupt the run
    pub fn validate(&self) -> Result<()> {
        let p = self.fold_fraction;
        if !p.is_finite() || p <= 0.0 || p > 1.0 {
            return Err(EvaluationError::InvalidFoldFraction { value: p });
        }
        if self.neighbors == 0 {
            return Err(EvaluationError::InvalidNeighbors { value: 0 });
        }
        if let MissingPrediction::Constant(value) = self.missing_prediction {
            if !value.is_finite() {
                return Err(EvaluationError::InvalidMissingPrediction { value });
            }
        }
        Ok(())
    }
}
