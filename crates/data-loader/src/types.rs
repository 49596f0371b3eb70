//! Core domain types for rating data.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - `RatingRecord`: one (actor, item, rating) triple as it arrives from ingestion
//! - `PreferenceStore`: the sparse actor × item matrix built from those triples
//!
//! The same `PreferenceStore` type holds the transposed (item × actor) matrix,
//! so similarity and ranking code works unchanged on either orientation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of the rating subject (a user, a voter, ...)
pub type ActorId = String;

/// Identifier of the rated entity (a movie, a bill subject, ...)
pub type ItemId = String;

/// Ratings of one row of the store, keyed by column id
pub type RatingVector = BTreeMap<String, f64>;

// =============================================================================
// Rating Record
// =============================================================================

/// A single observed preference: `actor_id` rated `item_id` with `rating`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub actor_id: ActorId,
    pub item_id: ItemId,
    pub rating: f64,
}

impl RatingRecord {
    pub fn new(actor_id: impl Into<ActorId>, item_id: impl Into<ItemId>, rating: f64) -> Self {
        Self {
            actor_id: actor_id.into(),
            item_id: item_id.into(),
            rating,
        }
    }
}

// =============================================================================
// PreferenceStore - the sparse rating matrix
// =============================================================================

/// Sparse rating matrix: row id -> (column id -> rating).
///
/// In the usual orientation rows are actors and columns are items. After
/// [`PreferenceStore::transpose`] rows are items and columns are actors.
///
/// Absence of a column in a row means "unrated", never "rated zero".
///
/// Rows and columns are kept in `BTreeMap`s so iteration order is the sorted
/// id order. Everything downstream that iterates the store (ranking ties,
/// recommendation ties) inherits that order and is therefore deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceStore {
    pub(crate) rows: BTreeMap<String, RatingVector>,
}

impl PreferenceStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    /// Insert a rating. A repeated (row, column) pair overwrites the
    /// previous value.
    pub fn insert_rating(
        &mut self,
        row: impl Into<String>,
        column: impl Into<String>,
        rating: f64,
    ) {
        self.rows
            .entry(row.into())
            .or_default()
            .insert(column.into(), rating);
    }

    /// All ratings of a row, if the row exists
    pub fn get_ratings(&self, row: &str) -> Option<&RatingVector> {
        self.rows.get(row)
    }

    /// A single rating
    pub fn get_rating(&self, row: &str, column: &str) -> Option<f64> {
        self.rows.get(row)?.get(column).copied()
    }

    pub fn contains(&self, row: &str) -> bool {
        self.rows.contains_key(row)
    }

    /// Row ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// (row id, ratings) pairs in sorted row order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RatingVector)> {
        self.rows.iter().map(|(id, ratings)| (id.as_str(), ratings))
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mean rating of a row, `None` if the row is absent
    pub fn mean_rating(&self, row: &str) -> Option<f64> {
        let ratings = self.rows.get(row)?;
        if ratings.is_empty() {
            return None;
        }
        Some(ratings.values().sum::<f64>() / ratings.len() as f64)
    }

    /// Mean over every rating in the store, `None` if the store is empty
    pub fn global_mean(&self) -> Option<f64> {
        let (total, count) = self
            .rows
            .values()
            .flat_map(|ratings| ratings.values())
            .fold((0.0, 0usize), |(sum, n), rating| (sum + rating, n + 1));
        if count == 0 {
            None
        } else {
            Some(total / count as f64)
        }
    }

    /// Get counts for debugging/validation: (rows, distinct columns, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut columns = std::collections::BTreeSet::new();
        let mut total_ratings = 0;
        for ratings in self.rows.values() {
            total_ratings += ratings.len();
            columns.extend(ratings.keys().map(String::as_str));
        }
        (self.rows.len(), columns.len(), total_ratings)
    }
}
