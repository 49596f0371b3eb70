//! Contiguous fold partitioning.
//!
//! With `total` records and fold fraction `p`:
//!
//! - fold size = floor(p * total)
//! - fold count = ceil(total / fold size)
//! - fold i holds out records [i * size, min((i + 1) * size, total))
//!
//! The last fold is clamped to the end of the sequence and may be shorter
//! than the others. Every record is held out by exactly one fold.

use crate::error::{EvaluationError, Result};
use data_loader::RatingRecord;
use std::ops::Range;

/// Fold layout for a record sequence of known length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldPlan {
    total: usize,
    fold_size: usize,
    fold_count: usize,
}

/// One fold's view of the record sequence
#[derive(Debug, Clone, Copy)]
pub struct Fold<'a> {
    pub index: usize,
    pub bounds: (usize, usize),
    pub held_out: &'a [RatingRecord],
    before: &'a [RatingRecord],
    after: &'a [RatingRecord],
}

impl<'a> Fold<'a> {
    /// Every record outside the held-out slice, in sequence order
    pub fn training(&self) -> impl Iterator<Item = &'a RatingRecord> + use<'a> {
        self.before.iter().chain(self.after.iter())
    }

    pub fn training_len(&self) -> usize {
        self.before.len() + self.after.len()
    }
}

impl FoldPlan {
    /// Plan folds for `total` records held out `fraction` at a time.
    ///
    /// Fails when the fraction is outside (0, 1], when the fold size rounds
    /// down to zero, or when a fold would hold out every record.
    pub fn new(total: usize, fraction: f64) -> Result<Self> {
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(EvaluationError::InvalidFoldFraction { value: fraction });
        }

        let fold_size = (fraction * total as f64).floor() as usize;
        if fold_size == 0 {
            return Err(EvaluationError::FoldSizeZero { fraction, total });
        }
        if fold_size >= total {
            return Err(EvaluationError::EmptyTrainingSet { fraction, total });
        }

        Ok(Self {
            total,
            fold_size,
            fold_count: total.div_ceil(fold_size),
        })
    }

    pub fn fold_size(&self) -> usize {
        self.fold_size
    }

    pub fn fold_count(&self) -> usize {
        self.fold_count
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Held-out index range of fold `fold`
    pub fn bounds(&self, fold: usize) -> Result<Range<usize>> {
        let start = fold.saturating_mul(self.fold_size);
        let end = start.saturating_add(self.fold_size).min(self.total);
        if fold >= self.fold_count || start >= self.total {
            return Err(EvaluationError::SegmentOutOfRange {
                fold,
                start,
                end: start.saturating_add(self.fold_size),
                total: self.total,
            });
        }
        Ok(start..end)
    }

    /// Split `records` into fold `fold`'s held-out slice and training rest
    pub fn fold<'a>(&self, records: &'a [RatingRecord], fold: usize) -> Result<Fold<'a>> {
        let range = self.bounds(fold)?;
        if records.len() != self.total {
            return Err(EvaluationError::SegmentOutOfRange {
                fold,
                start: range.start,
                end: range.end,
                total: records.len(),
            });
        }

        Ok(Fold {
            index: fold,
            bounds: (range.start, range.end),
            held_out: &records[range.clone()],
            before: &records[..range.start],
            after: &records[range.end..],
        })
    }
}
