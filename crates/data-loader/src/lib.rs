//! # Data Loader Crate
//!
//! Loads rating data and builds the sparse preference matrix the
//! recommender works on.
//!
//! ## Main Components
//!
//! - **types**: `RatingRecord` and `PreferenceStore`
//! - **index**: store building, transposition and record validation
//! - **parser**: JSON / JSON lines / delimited record files
//! - **ballots**: roll-call vote documents tallied into records
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{parser, PreferenceStore, RecordFormat};
//! use std::path::Path;
//!
//! let records = parser::load_records(Path::new("ratings.json"), RecordFormat::JsonArray)?;
//! let store = PreferenceStore::from_records(&records)?;
//! let by_item = store.transpose();
//!
//! let (actors, items, ratings) = store.counts();
//! println!("{} actors rated {} items ({} ratings)", actors, items, ratings);
//! ```

// Public modules
pub mod ballots;
pub mod error;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::validate_records;
pub use parser::{RecordFormat, load_records};
pub use types::{ActorId, ItemId, PreferenceStore, RatingRecord, RatingVector};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_creation() {
        let store = PreferenceStore::new();
        let (rows, columns, ratings) = store.counts();

        assert_eq!(rows, 0);
        assert_eq!(columns, 0);
        assert_eq!(ratings, 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_rating() {
        let mut store = PreferenceStore::new();
        store.insert_rating("alice", "x", 5.0);

        let ratings = store.get_ratings("alice").unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings["x"], 5.0);
        assert!(store.contains("alice"));
    }

    #[test]
    fn test_empty_queries() {
        let store = PreferenceStore::new();

        // Querying non-existent data should return None
        assert!(store.get_ratings("nobody").is_none());
        assert!(store.get_rating("nobody", "x").is_none());
        assert!(store.mean_rating("nobody").is_none());
    }
}
