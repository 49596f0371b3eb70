//! Shared result type for ranked outputs.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// An id paired with a score: a similarity in a match list, or a predicted
/// rating in a recommendation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scored {
    pub score: f64,
    pub id: String,
}

impl Scored {
    pub fn new(score: f64, id: impl Into<String>) -> Self {
        Self {
            score,
            id: id.into(),
        }
    }
}

/// Sort by score, highest first.
///
/// The sort is stable, so entries with equal scores keep their input order.
/// All callers feed entries in ascending id order, which makes ties come out
/// in ascending id order.
pub fn sort_descending(entries: &mut [Scored]) {
    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}
