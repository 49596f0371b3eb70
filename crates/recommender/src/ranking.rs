//! Top-N selection of the rows most similar to a subject row.

use crate::traits::Similarity;
use crate::types::{Scored, sort_descending};
use data_loader::PreferenceStore;

/// The `n` rows of `store` most similar to `subject`, best first.
///
/// Every row except `subject` itself is scored, including rows that share
/// nothing with it (they score 0). Equal scores keep the store's ascending
/// id order.
pub fn top_matches(
    store: &PreferenceStore,
    subject: &str,
    n: usize,
    similarity: &dyn Similarity,
) -> Vec<Scored> {
    let mut scores: Vec<Scored> = store
        .ids()
        .filter(|&other| other != subject)
        .map(|other| Scored::new(similarity.similarity(store, subject, other), other))
        .collect();

    sort_descending(&mut scores);
    scores.truncate(n);
    scores
}
