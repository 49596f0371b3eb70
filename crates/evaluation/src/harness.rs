//! # K-fold Cross-Validation Harness
//!
//! Measures how well item-based recommendation predicts ratings it has not
//! seen:
//!
//! 1. Plan contiguous folds over the record sequence
//! 2. For each fold, build a fresh `PreferenceStore` from the training
//!    records and a fresh `ItemSimilarityIndex` over it
//! 3. Predict every held-out rating from the actor's item-based
//!    recommendation list (computed once per actor per fold)
//! 4. Reduce the squared errors of the fold to an RMSE
//!
//! Folds share nothing but the input records, so they can run on the Rayon
//! thread pool without changing the result.

use crate::config::EvaluationConfig;
use crate::error::Result;
use crate::folds::{Fold, FoldPlan};
use crate::metrics::{self, SquaredError};
use data_loader::{PreferenceStore, RatingRecord, validate_records};
use rayon::prelude::*;
use recommender::{ItemSimilarityIndex, Scored, recommend_items};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// Outcome of a single fold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoldReport {
    /// Zero-based fold number
    pub fold: usize,
    /// Held-out range [start, end) in the record sequence
    pub start: usize,
    pub end: usize,
    pub training_count: usize,
    pub held_out: usize,
    /// Held-out records found in the actor's recommendation list
    pub predicted: usize,
    /// Held-out records filled in by the missing-prediction policy
    pub defaulted: usize,
    /// Held-out records left out of the RMSE
    pub skipped: usize,
    /// `None` when no held-out record was predicted or defaulted
    pub rmse: Option<f64>,
}

/// Per-fold results of a run, in fold order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub config: EvaluationConfig,
    pub folds: Vec<FoldReport>,
}

impl EvaluationReport {
    /// Per-fold RMSE values in fold order
    pub fn rmses(&self) -> Vec<Option<f64>> {
        self.folds.iter().map(|f| f.rmse).collect()
    }

    /// RMSE of every fold that scored at least one record
    pub fn scored_rmses(&self) -> Vec<f64> {
        self.folds.iter().filter_map(|f| f.rmse).collect()
    }

    /// Mean over scored folds; `None` if no fold scored anything
    pub fn mean_rmse(&self) -> Option<f64> {
        let scored = self.scored_rmses();
        (!scored.is_empty()).then(|| metrics::mean(&scored))
    }

    pub fn std_rmse(&self) -> Option<f64> {
        let scored = self.scored_rmses();
        (!scored.is_empty()).then(|| metrics::std_dev(&scored))
    }

    /// Folds without an RMSE
    pub fn unscored_folds(&self) -> usize {
        self.folds.iter().filter(|f| f.rmse.is_none()).count()
    }

    /// Total held-out records left out of every fold's RMSE
    pub fn total_skipped(&self) -> usize {
        self.folds.iter().map(|f| f.skipped).sum()
    }
}

/// Runs k-fold evaluation with a fixed configuration
#[derive(Debug, Clone)]
pub struct CrossValidator {
    config: EvaluationConfig,
}

impl CrossValidator {
    /// Create a validator, rejecting an invalid configuration up front
    pub fn new(config: EvaluationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Evaluate every fold of `records`.
    ///
    /// Fails before any fold runs if the records are invalid or the fold
    /// fraction does not partition them.
    #[instrument(skip_all, fields(records = records.len(), p = self.config.fold_fraction))]
    pub fn evaluate(&self, records: &[RatingRecord]) -> Result<EvaluationReport> {
        validate_records(records)?;
        let plan = FoldPlan::new(records.len(), self.config.fold_fraction)?;
        info!(
            "Cross-validating {} records: {} folds of {}",
            plan.total(),
            plan.fold_count(),
            plan.fold_size()
        );

        let folds = if self.config.parallel {
            (0..plan.fold_count())
                .into_par_iter()
                .map(|i| self.evaluate_fold(plan.fold(records, i)?))
                .collect::<Result<Vec<_>>>()?
        } else {
            (0..plan.fold_count())
                .map(|i| self.evaluate_fold(plan.fold(records, i)?))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(EvaluationReport {
            config: self.config.clone(),
            folds,
        })
    }

    /// Train on everything but the fold and score its held-out records
    #[instrument(skip_all, fields(fold = fold.index + 1))]
    fn evaluate_fold(&self, fold: Fold<'_>) -> Result<FoldReport> {
        let (start, end) = fold.bounds;
        info!("Segment {} ({}:{})", fold.index + 1, start, end);

        let training = PreferenceStore::from_records(fold.training())?;
        let index = ItemSimilarityIndex::build(&training, self.config.neighbors);

        // recommendation lists live only as long as this fold
        let mut seen: HashMap<&str, Vec<Scored>> = HashMap::new();
        let mut error = SquaredError::new();
        let (mut predicted, mut defaulted, mut skipped) = (0usize, 0usize, 0usize);

        for record in fold.held_out {
            let actor = record.actor_id.as_str();
            let recommendations = seen
                .entry(actor)
                .or_insert_with(|| recommend_items(&training, &index, actor));

            let found = recommendations
                .iter()
                .find(|r| r.id == record.item_id)
                .map(|r| r.score);

            match found {
                Some(prediction) => {
                    error.add(prediction, record.rating);
                    predicted += 1;
                }
                None => match self.config.missing_prediction.fallback(&training, actor) {
                    Some(prediction) => {
                        error.add(prediction, record.rating);
                        defaulted += 1;
                    }
                    None => {
                        debug!("No prediction for {} / {}", actor, record.item_id);
                        skipped += 1;
                    }
                },
            }
        }

        let rmse = error.rmse();
        match rmse {
            Some(value) => info!("rmse = {:.5}", value),
            None => warn!(
                "Segment {}: none of {} held-out records could be predicted",
                fold.index + 1,
                fold.held_out.len()
            ),
        }

        Ok(FoldReport {
            fold: fold.index,
            start,
            end,
            training_count: fold.training_len(),
            held_out: fold.held_out.len(),
            predicted,
            defaulted,
            skipped,
            rmse,
        })
    }
}

/// k-fold RMSEs of item-based prediction with default settings and fold
/// fraction `fold_fraction`, one entry per fold
pub fn k_fold_rmse(records: &[RatingRecord], fold_fraction: f64) -> Result<Vec<Option<f64>>> {
    let validator = CrossValidator::new(EvaluationConfig::new(fold_fraction))?;
    Ok(validator.evaluate(records)?.rmses())
}
