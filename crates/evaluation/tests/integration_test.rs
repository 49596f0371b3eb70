//! Integration tests for the evaluation harness.
//!
//! These tests drive records through the loader types, the recommender and
//! the cross-validator together.

use data_loader::ballots::{Ballot, VoteTally};
use data_loader::{PreferenceStore, RatingRecord};
use evaluation::{
    CrossValidator, EvaluationConfig, EvaluationError, FoldPlan, MissingPrediction, k_fold_rmse,
};
use recommender::{ItemSimilarityIndex, recommend_items};

/// 10 actors x 5 items laid out so every fold holds out one item per actor.
///
/// `rating` decides what actor `a` gave item `i`.
fn diagonal(rating: impl Fn(usize, usize) -> f64) -> Vec<RatingRecord> {
    (0..50)
        .map(|step| {
            let actor = step % 10;
            let item = (actor + step / 10) % 5;
            RatingRecord::new(format!("actor{actor}"), format!("item{item}"), rating(actor, item))
        })
        .collect()
}

#[test]
fn test_exact_predictions_give_zero_rmse() {
    // every actor rates every item the same, so all item columns correlate
    // perfectly and each prediction equals the actor's constant rating
    let records = diagonal(|actor, _| 1.0 + (actor % 5) as f64);

    let report = CrossValidator::new(EvaluationConfig::new(0.2))
        .unwrap()
        .evaluate(&records)
        .unwrap();

    assert_eq!(report.rmses(), vec![Some(0.0); 5]);
    assert!(report.folds.iter().all(|f| f.predicted == 10 && f.skipped == 0));
    assert_eq!(report.mean_rmse(), Some(0.0));
}

#[test]
fn test_noisy_ratings_produce_positive_error() {
    let records = diagonal(|actor, item| 1.0 + ((actor * 7 + item * 3) % 5) as f64);

    let rmses = k_fold_rmse(&records, 0.2).unwrap();

    assert_eq!(rmses.len(), 5);
    assert!(rmses.iter().all(|r| r.is_some_and(|v| v.is_finite() && v >= 0.0)));
    assert!(rmses.iter().flatten().any(|r| *r > 0.0));
}

#[test]
fn test_ten_records_five_folds() {
    let records: Vec<RatingRecord> = (0..10)
        .map(|i| {
            RatingRecord::new(
                format!("actor{}", i % 5),
                format!("item{}", i % 3),
                1.0 + i as f64,
            )
        })
        .collect();

    let plan = FoldPlan::new(records.len(), 0.2).unwrap();
    assert_eq!(plan.fold_count(), 5);

    let report = CrossValidator::new(EvaluationConfig::new(0.2))
        .unwrap()
        .evaluate(&records)
        .unwrap();
    assert_eq!(report.folds.len(), 5);
    assert!(report.folds.iter().all(|f| f.held_out == 2 && f.training_count == 8));
}

#[test]
fn test_fold_prediction_matches_direct_pipeline() {
    let records = diagonal(|actor, item| 1.0 + ((actor * 7 + item * 3) % 5) as f64);
    let report = CrossValidator::new(EvaluationConfig::new(0.2))
        .unwrap()
        .evaluate(&records)
        .unwrap();

    // rebuild fold 0 by hand and recompute its RMSE
    let training = PreferenceStore::from_records(&records[10..]).unwrap();
    let index = ItemSimilarityIndex::build(&training, 10);
    let mut sum = 0.0;
    let mut count = 0;
    for record in &records[..10] {
        let recs = recommend_items(&training, &index, &record.actor_id);
        if let Some(found) = recs.iter().find(|r| r.id == record.item_id) {
            sum += (found.score - record.rating).powi(2);
            count += 1;
        }
    }

    assert_eq!(report.folds[0].predicted, count);
    let expected = evaluation::rmse(sum, count).unwrap();
    assert!((report.folds[0].rmse.unwrap() - expected).abs() < 1e-12);
}

#[test]
fn test_actor_mean_policy_covers_every_record() {
    // "newcomer" appears only in the first fold, so it has no training data
    let mut records = diagonal(|actor, item| 1.0 + ((actor + 2 * item) % 5) as f64);
    records.insert(0, RatingRecord::new("newcomer", "item0", 5.0));

    let config = EvaluationConfig::new(0.2)
        .with_missing_prediction(MissingPrediction::ActorMean)
        .with_parallel(true);
    let report = CrossValidator::new(config).unwrap().evaluate(&records).unwrap();

    assert_eq!(report.total_skipped(), 0);
    assert!(report.folds[0].defaulted >= 1);
    let held_out: usize = report.folds.iter().map(|f| f.held_out).sum();
    assert_eq!(held_out, records.len());
}

#[test]
fn test_configuration_errors_abort_the_run() {
    let records = diagonal(|_, _| 1.0);

    let err = k_fold_rmse(&records, 0.01).unwrap_err();
    assert!(matches!(err, EvaluationError::FoldSizeZero { total: 50, .. }));
    assert!(err.to_string().contains("p = 0.01"));

    let err = k_fold_rmse(&records, 1.0).unwrap_err();
    assert!(matches!(err, EvaluationError::EmptyTrainingSet { .. }));

    let err = CrossValidator::new(EvaluationConfig::new(2.0)).unwrap_err();
    assert!(matches!(err, EvaluationError::InvalidFoldFraction { .. }));
}

#[test]
fn test_ballots_feed_the_harness() {
    let documents = [
        r#"{"subjects": ["tax", "health"], "votes": {"Aye": [{"id": "m1"}, {"id": "m2"}], "No": [{"id": "m3"}, {"id": "m4"}]}}"#,
        r#"{"subjects": ["tax", "energy"], "votes": {"Aye": [{"id": "m1"}, {"id": "m3"}], "No": [{"id": "m2"}, {"id": "m4"}]}}"#,
        r#"{"subjects": ["health", "energy"], "votes": {"Yea": [{"id": "m4"}], "Nay": [{"id": "m1"}, {"id": "m2"}, {"id": "m3"}]}}"#,
        r#"{"subjects": ["defense"], "votes": {"Not Voting": [{"id": "m1"}]}}"#,
    ];

    let mut tally = VoteTally::new();
    for document in documents {
        let ballot: Ballot = serde_json::from_str(document).unwrap();
        tally.record_ballot(&ballot);
    }
    assert_eq!(tally.ballot_counts(), (3, 1));

    let records = tally.into_records();
    // 4 members x 3 subjects
    assert_eq!(records.len(), 12);
    assert!(records.iter().all(|r| (0.0..=1.0).contains(&r.rating)));

    let report = CrossValidator::new(EvaluationConfig::new(0.25))
        .unwrap()
        .evaluate(&records)
        .unwrap();
    assert_eq!(report.folds.len(), 4);
    assert!(report.scored_rmses().iter().all(|r| *r >= 0.0));
}
