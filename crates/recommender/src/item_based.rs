//! Item-based collaborative filtering.
//!
//! Predicts an actor's rating of an unseen item from the actor's own ratings
//! of the items most similar to it, using a prebuilt `ItemSimilarityIndex`.

use crate::item_index::ItemSimilarityIndex;
use crate::types::{Scored, sort_descending};
use data_loader::PreferenceStore;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Predicted ratings for every item reachable from the actor's rated items.
///
/// For each rated item, every neighbour the actor has not rated gains
/// `similarity * rating` and `similarity`. The prediction is the ratio of
/// the two; a neighbour whose similarities sum to exactly 0 is reported
/// with a score of 0.
///
/// An actor missing from the store has nothing to start from and gets an
/// empty list.
#[instrument(skip(store, index))]
pub fn recommend_items(
    store: &PreferenceStore,
    index: &ItemSimilarityIndex,
    actor: &str,
) -> Vec<Scored> {
    let Some(user_ratings) = store.get_ratings(actor) else {
        debug!("Actor {} has no ratings", actor);
        return Vec::new();
    };

    // candidate -> (weighted score, similarity sum)
    let mut scores: BTreeMap<&str, (f64, f64)> = BTreeMap::new();

    for (item, &rating) in user_ratings {
        for neighbor in index.similar_items(item) {
            if user_ratings.contains_key(&neighbor.id) {
                continue;
            }
            let entry = scores.entry(neighbor.id.as_str()).or_insert((0.0, 0.0));
            entry.0 += neighbor.score * rating;
            entry.1 += neighbor.score;
        }
    }

    let mut rankings: Vec<Scored> = scores
        .into_iter()
        .map(|(item, (score, total_sim))| {
            if total_sim != 0.0 {
                Scored::new(score / total_sim, item)
            } else {
                Scored::new(0.0, item)
            }
        })
        .collect();
    sort_descending(&mut rankings);
    rankings
}
