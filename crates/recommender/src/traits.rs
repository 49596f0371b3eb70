//! Core traits for the recommender.
//!
//! This module defines the Similarity trait that lets ranking, user-based
//! recommendation and the item index work with any similarity metric.

use data_loader::PreferenceStore;

/// Agreement score between two rows of a preference store.
///
/// ## Contract
/// - Only columns present in both rows are compared
/// - "Nothing to compare" (no shared columns, zero variance, unknown id)
///   yields 0, never an error or NaN
/// - `Send + Sync` so an index can be built in parallel with one metric
pub trait Similarity: Send + Sync {
    /// Returns the name of this metric (for logging/debugging)
    fn name(&self) -> &str;

    /// Similarity between rows `a` and `b` of `store`
    fn similarity(&self, store: &PreferenceStore, a: &str, b: &str) -> f64;
}
