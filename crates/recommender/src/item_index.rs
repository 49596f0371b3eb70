//! Precomputed item-to-item similarity table.
//!
//! Item-based recommendation needs, for every item, the items whose rating
//! columns look most like its own. Computing that is the expensive part of
//! the item-based path, so it is done once per store and then only read.
//!
//! ## Algorithm
//! 1. Transpose the actor-centric store into an item-centric one
//! 2. For every item, run `top_matches` against the transposed store
//!
//! Step 2 is independent per item and runs on the Rayon thread pool.

use crate::ranking::top_matches;
use crate::similarity::Pearson;
use crate::traits::Similarity;
use crate::types::Scored;
use data_loader::PreferenceStore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// item id -> up to `n` most similar items, best first.
///
/// Never patched in place: when the store changes, build a new index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemSimilarityIndex {
    neighbors: BTreeMap<String, Vec<Scored>>,
    n: usize,
}

impl ItemSimilarityIndex {
    /// Build the index with Pearson similarity, keeping `n` neighbours per item
    pub fn build(store: &PreferenceStore, n: usize) -> Self {
        Self::build_with_similarity(store, n, &Pearson)
    }

    /// Build the index with an arbitrary similarity metric
    #[instrument(skip(store, similarity), fields(metric = similarity.name()))]
    pub fn build_with_similarity(
        store: &PreferenceStore,
        n: usize,
        similarity: &dyn Similarity,
    ) -> Self {
        let item_prefs = store.transpose();
        let items: Vec<&str> = item_prefs.ids().collect();
        debug!("Computing neighbours for {} items", items.len());

        let neighbors: BTreeMap<String, Vec<Scored>> = items
            .par_iter()
            .map(|&item| {
                let similar = top_matches(&item_prefs, item, n, similarity);
                (item.to_string(), similar)
            })
            .collect();

        info!("Built item similarity index: {} items, n = {}", neighbors.len(), n);
        Self { neighbors, n }
    }

    #[cfg(test)]
    pub(crate) fn from_neighbors(neighbors: BTreeMap<String, Vec<Scored>>, n: usize) -> Self {
        Self { neighbors, n }
    }

    /// Most similar items to `item`; empty if the item is not indexed
    pub fn similar_items(&self, item: &str) -> &[Scored] {
        self.neighbors
            .get(item)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, item: &str) -> bool {
        self.neighbors.contains_key(item)
    }

    /// Neighbour list length the index was built with
    pub fn neighbors_per_item(&self) -> usize {
        self.n
    }

    /// Number of indexed items
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Scored])> {
        self.neighbors
            .iter()
            .map(|(item, similar)| (item.as_str(), similar.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::Euclidean;

    fn store() -> PreferenceStore {
        let mut store = PreferenceStore::new();
        let ratings: &[(&str, &str, f64)] = &[
            ("a", "x", 1.0),
            ("a", "y", 2.0),
            ("a", "z", 5.0),
            ("b", "x", 2.0),
            ("b", "y", 3.0),
            ("b", "z", 4.0),
            ("c", "x", 3.0),
            ("c", "y", 4.0),
            ("c", "z", 1.0),
            ("c", "w", 2.0),
        ];
        for &(actor, item, rating) in ratings {
            store.insert_rating(actor, item, rating);
        }
        store
    }

    #[test]
    fn test_every_item_is_indexed() {
        let index = ItemSimilarityIndex::build(&store(), 10);

        assert_eq!(index.len(), 4);
        for item in ["w", "x", "y", "z"] {
            assert!(index.contains(item));
            assert_eq!(index.similar_items(item).len(), 3);
            assert!(index.similar_items(item).iter().all(|s| s.id != item));
        }
    }

    #[test]
    fn test_neighbors_ranked_by_pearson() {
        let index = ItemSimilarityIndex::build(&store(), 2);
        let similar = index.similar_items("x");

        assert_eq!(index.neighbors_per_item(), 2);
        assert_eq!(similar.len(), 2);
        // x and y move together across a, b, c
        assert_eq!(similar[0].id, "y");
        assert!((similar[0].score - 1.0).abs() < 1e-9);
        assert!(similar[0].score >= similar[1].score);
    }

    #[test]
    fn test_matches_sequential_top_matches() {
        let prefs = store();
        let index = ItemSimilarityIndex::build_with_similarity(&prefs, 3, &Euclidean);
        let items = prefs.transpose();

        for (item, similar) in index.iter() {
            assert_eq!(similar, top_matches(&items, item, 3, &Euclidean).as_slice());
        }
    }

    #[test]
    fn test_unknown_item_and_empty_store() {
        let index = ItemSimilarityIndex::build(&store(), 5);
        assert!(index.similar_items("missing").is_empty());

        let empty = ItemSimilarityIndex::build(&PreferenceStore::new(), 5);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_index_serializes() {
        let index = ItemSimilarityIndex::build(&store(), 2);
        let json = serde_json::to_string(&index).unwrap();
        let restored: ItemSimilarityIndex = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.len(), index.len());
        for (item, similar) in index.iter() {
            let other = restored.similar_items(item);
            assert_eq!(other.len(), similar.len());
            for (a, b) in similar.iter().zip(other) {
                assert_eq!(a.id, b.id);
                assert!((a.score - b.score).abs() < 1e-12);
            }
        }
    }
}
