//! PreferenceStore building and reindexing.
//!
//! - `from_records` groups validated rating records by actor
//! - `transpose` flips the matrix so rows become items
//! - `RatingRecord::validate` is the defensive contract at the store's edge

use crate::error::{DataLoadError, Result};
use crate::types::*;
use tracing::debug;

impl RatingRecord {
    /// Check that the record is structurally usable: both ids non-empty and
    /// the rating a finite number.
    ///
    /// `index` is only used to locate the record in the error message.
    pub fn validate(&self, index: usize) -> Result<()> {
        if self.actor_id.trim().is_empty() {
            return Err(DataLoadError::InvalidRecord {
                index,
                reason: "empty actor_id".to_string(),
            });
        }
        if self.item_id.trim().is_empty() {
            return Err(DataLoadError::InvalidRecord {
                index,
                reason: "empty item_id".to_string(),
            });
        }
        if !self.rating.is_finite() {
            return Err(DataLoadError::InvalidRecord {
                index,
                reason: format!("rating {} is not a finite number", self.rating),
            });
        }
        Ok(())
    }
}

/// Validate a whole record sequence, failing on the first bad record.
pub fn validate_records(records: &[RatingRecord]) -> Result<()> {
    for (index, record) in records.iter().enumerate() {
        record.validate(index)?;
    }
    Ok(())
}

impl PreferenceStore {
    /// Build an actor-centric store from rating records.
    ///
    /// Later records win over earlier ones for the same (actor, item) pair.
    /// A structurally invalid record aborts the build.
    pub fn from_records<'a, I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a RatingRecord>,
    {
        let mut store = PreferenceStore::new();
        let mut inserted = 0usize;

        for (index, record) in records.into_iter().enumerate() {
            record.validate(index)?;
            store.insert_rating(record.actor_id.as_str(), record.item_id.as_str(), record.rating);
            inserted += 1;
        }

        debug!(
            "Built preference store: {} records into {} rows",
            inserted,
            store.len()
        );
        Ok(store)
    }

    /// Reindex the matrix by column: every `rows[r][c] = v` becomes
    /// `result[c][r] = v`.
    ///
    /// Transposing an actor × item store yields the item × actor store.
    pub fn transpose(&self) -> PreferenceStore {
        let mut result = PreferenceStore::new();
        for (row, ratings) in &self.rows {
            for (column, &rating) in ratings {
                result
                    .rows
                    .entry(column.clone())
                    .or_default()
                    .insert(row.clone(), rating);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<RatingRecord> {
        vec![
            RatingRecord::new("alice", "x", 1.0),
            RatingRecord::new("alice", "y", 2.0),
            RatingRecord::new("bob", "x", 2.0),
            RatingRecord::new("bob", "z", 4.0),
        ]
    }

    #[test]
    fn test_from_records_groups_by_actor() {
        let store = PreferenceStore::from_records(&records()).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get_rating("alice", "y"), Some(2.0));
        assert_eq!(store.get_rating("bob", "z"), Some(4.0));
        assert_eq!(store.get_rating("alice", "z"), None);
        assert_eq!(store.counts(), (2, 3, 4));
    }

    #[test]
    fn test_duplicate_pair_last_write_wins() {
        let records = vec![
            RatingRecord::new("alice", "x", 1.0),
            RatingRecord::new("alice", "x", 3.5),
        ];
        let store = PreferenceStore::from_records(&records).unwrap();

        assert_eq!(store.get_rating("alice", "x"), Some(3.5));
        assert_eq!(store.counts(), (1, 1, 1));
    }

    #[test]
    fn test_transpose_flips_rows_and_columns() {
        let store = PreferenceStore::from_records(&records()).unwrap();
        let items = store.transpose();

        assert_eq!(items.ids().collect::<Vec<_>>(), vec!["x", "y", "z"]);
        assert_eq!(items.get_rating("x", "alice"), Some(1.0));
        assert_eq!(items.get_rating("x", "bob"), Some(2.0));
        assert_eq!(items.get_rating("z", "bob"), Some(4.0));
        assert_eq!(items.get_ratings("y").map(|r| r.len()), Some(1));
    }

    #[test]
    fn test_transpose_round_trip() {
        let store = PreferenceStore::from_records(&records()).unwrap();
        assert_eq!(store.transpose().transpose(), store);

        let empty = PreferenceStore::new();
        assert_eq!(empty.transpose().transpose(), empty);
    }

    #[test]
    fn test_invalid_records_are_rejected() {
        let bad_rating = vec![
            RatingRecord::new("alice", "x", 1.0),
            RatingRecord::new("bob", "y", f64::NAN),
        ];
        let err = PreferenceStore::from_records(&bad_rating).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidRecord { index: 1, .. }));

        let empty_actor = vec![RatingRecord::new("  ", "x", 1.0)];
        assert!(validate_records(&empty_actor).is_err());

        let empty_item = vec![RatingRecord::new("alice", "", 1.0)];
        assert!(validate_records(&empty_item).is_err());
    }

    #[test]
    fn test_means() {
        let store = PreferenceStore::from_records(&records()).unwrap();

        assert_eq!(store.mean_rating("alice"), Some(1.5));
        assert_eq!(store.mean_rating("bob"), Some(3.0));
        assert_eq!(store.mean_rating("carol"), None);
        assert_eq!(store.global_mean(), Some(2.25));
        assert_eq!(PreferenceStore::new().global_mean(), None);
    }
}
