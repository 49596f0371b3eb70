//! User-based collaborative filtering.
//!
//! "Actors who rate like you rated these items like this."
//!
//! ## Algorithm
//! 1. Score every other actor against the subject
//! 2. Drop actors with similarity <= 0 (no corroborating signal)
//! 3. For each item the subject has not rated (or rated 0), accumulate
//!    `similarity * rating` and `similarity` over the remaining actors
//! 4. Predicted rating = weighted total / similarity sum, best first

use crate::traits::Similarity;
use crate::types::{Scored, sort_descending};
use data_loader::PreferenceStore;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Predict the subject's rating for every item it has not rated yet.
#[instrument(skip(store, similarity), fields(metric = similarity.name()))]
pub fn recommend(
    store: &PreferenceStore,
    subject: &str,
    similarity: &dyn Similarity,
) -> Vec<Scored> {
    let subject_ratings = store.get_ratings(subject);
    let is_unrated = |item: &str| {
        subject_ratings
            .and_then(|ratings| ratings.get(item))
            .is_none_or(|&rating| rating == 0.0)
    };

    // item -> (weighted total, similarity sum)
    let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    let mut contributors = 0usize;

    for (other, ratings) in store.iter() {
        if other == subject {
            continue;
        }
        let sim = similarity.similarity(store, subject, other);
        if sim <= 0.0 {
            continue;
        }
        contributors += 1;

        for (item, &rating) in ratings {
            if is_unrated(item) {
                let entry = totals.entry(item.as_str()).or_insert((0.0, 0.0));
                entry.0 += rating * sim;
                entry.1 += sim;
            }
        }
    }

    let mut rankings: Vec<Scored> = totals
        .into_iter()
        .filter(|(_, (_, sim_sum))| *sim_sum > 0.0)
        .map(|(item, (total, sim_sum))| Scored::new(total / sim_sum, item))
        .collect();
    sort_descending(&mut rankings);

    debug!(
        "{} similar actors produced {} predictions",
        contributors,
        rankings.len()
    );
    rankings
}
