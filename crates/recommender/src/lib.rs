//! # Recommender Crate
//!
//! Memory-based collaborative filtering over a sparse `PreferenceStore`.
//!
//! ## Components
//!
//! ### Similarity Engine
//! Euclidean-derived and Pearson similarity over the columns two rows share,
//! behind the `Similarity` trait.
//!
//! ### Ranking
//! `top_matches`: the N rows most similar to a subject row.
//!
//! ### User-Based Recommender
//! Weighted average of the ratings of positively similar actors.
//!
//! ### Item-Based Recommender
//! `ItemSimilarityIndex` caches each item's nearest items once; predictions
//! are then a weighted average of the actor's own ratings.
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommender::{ItemSimilarityIndex, Pearson, recommend, recommend_items, top_matches};
//!
//! let similar_actors = top_matches(&store, "alice", 5, &Pearson);
//! let user_based = recommend(&store, "alice", &Pearson);
//!
//! let index = ItemSimilarityIndex::build(&store, 10);
//! let item_based = recommend_items(&store, &index, "alice");
//! ```

// Public modules
pub mod item_based;
pub mod item_index;
pub mod ranking;
pub mod similarity;
pub mod traits;
pub mod types;
pub mod user_based;

// Re-export commonly used types
pub use item_based::recommend_items;
pub use item_index::ItemSimilarityIndex;
pub use ranking::top_matches;
pub use similarity::{Euclidean, Pearson, SimilarityMetric};
pub use traits::Similarity;
pub use types::Scored;
pub use user_based::recommend;
