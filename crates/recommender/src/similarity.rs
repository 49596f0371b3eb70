//! Similarity metrics over sparse rating vectors.
//!
//! Both metrics look only at the columns two rows have in common:
//!
//! - **Euclidean**: `1 / (1 + Σ (a_i - b_i)²)`, in (0, 1], 1 for identical rows
//! - **Pearson**: linear correlation of the shared ratings, in [-1, 1]
//!
//! No overlap, zero variance and unknown ids all score 0.

use crate::traits::Similarity;
use data_loader::{PreferenceStore, RatingVector};

/// Distance-based similarity: `1 / (1 + sum of squared differences)`
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

/// Pearson correlation coefficient
#[derive(Debug, Clone, Copy, Default)]
pub struct Pearson;

/// Runtime choice between the built-in metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimilarityMetric {
    Euclidean,
    #[default]
    Pearson,
}

/// Rating pairs (a, b) for every column rated in both rows, in column order
fn shared_ratings(a: &RatingVector, b: &RatingVector) -> Vec<(f64, f64)> {
    a.iter()
        .filter_map(|(column, &x)| b.get(column).map(|&y| (x, y)))
        .collect()
}

fn rows<'s>(
    store: &'s PreferenceStore,
    a: &str,
    b: &str,
) -> Option<(&'s RatingVector, &'s RatingVector)> {
    Some((store.get_ratings(a)?, store.get_ratings(b)?))
}

/// Euclidean-derived similarity of two rating vectors
pub fn euclidean(a: &RatingVector, b: &RatingVector) -> f64 {
    let shared = shared_ratings(a, b);
    if shared.is_empty() {
        return 0.0;
    }

    let sum_of_squares: f64 = shared.iter().map(|(x, y)| (x - y).powi(2)).sum();
    1.0 / (1.0 + sum_of_squares)
}

/// Pearson correlation of two rating vectors
pub fn pearson(a: &RatingVector, b: &RatingVector) -> f64 {
    let shared = shared_ratings(a, b);
    if shared.is_empty() {
        return 0.0;
    }
    let n = shared.len() as f64;
    let mean_x = shared.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = shared.iter().map(|(_, y)| y).sum::<f64>() / n;

    if is_flat(shared.iter().map(|&(x, _)| x), mean_x, n)
        || is_flat(shared.iter().map(|&(_, y)| y), mean_y, n)
    {
        return 0.0;
    }

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(x, y) in &shared {
        let (dx, dy) = (x - mean_x, y - mean_y);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denominator = (sxx * syy).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    (sxy / denominator).clamp(-1.0, 1.0)
}

/// True when every value sits within rounding distance of the mean.
///
/// Summing n values can move the mean by about `n` ulps, so a constant
/// vector may show deviations of that size instead of exact zeros.
fn is_flat(mut values: impl Iterator<Item = f64>, mean: f64, n: f64) -> bool {
    let tolerance = n * f64::EPSILON * mean.abs();
    values.all(|v| (v - mean).abs() <= tolerance)
}

impl Similarity for Euclidean {
    fn name(&self) -> &str {
        "euclidean"
    }

    fn similarity(&self, store: &PreferenceStore, a: &str, b: &str) -> f64 {
        rows(store, a, b).map_or(0.0, |(a, b)| euclidean(a, b))
    }
}

impl Similarity for Pearson {
    fn name(&self) -> &str {
        "pearson"
    }

    fn similarity(&self, store: &PreferenceStore, a: &str, b: &str) -> f64 {
        rows(store, a, b).map_or(0.0, |(a, b)| pearson(a, b))
    }
}

impl Similarity for SimilarityMetric {
    fn name(&self) -> &str {
        match self {
            SimilarityMetric::Euclidean => Euclidean.name(),
            SimilarityMetric::Pearson => Pearson.name(),
        }
    }

    fn similarity(&self, store: &PreferenceStore, a: &str, b: &str) -> f64 {
        match self {
            SimilarityMetric::Euclidean => Euclidean.similarity(store, a, b),
            SimilarityMetric::Pearson => Pearson.similarity(store, a, b),
        }
    }
}
