//! Cross-validation of item-based collaborative filtering.
//!
//! This crate provides:
//! - `FoldPlan` for contiguous k-fold partitioning of a record sequence
//! - `CrossValidator` that rebuilds the store and item index per fold and
//!   reduces held-out prediction error to one RMSE per fold
//! - `EvaluationConfig` / `MissingPrediction` to control the run
//!
//! ## Example Usage
//! ```ignore
//! use evaluation::{CrossValidator, EvaluationConfig, MissingPrediction};
//!
//! let config = EvaluationConfig::new(0.1)
//!     .with_neighbors(10)
//!     .with_missing_prediction(MissingPrediction::ActorMean);
//!
//! let report = CrossValidator::new(config)?.evaluate(&records)?;
//! if let Some(mean) = report.mean_rmse() {
//!     println!("{:?} (mean {:.4})", report.rmses(), mean);
//! }
//! ```

pub mod config;
pub mod error;
pub mod folds;
pub mod harness;
pub mod metrics;

// Re-export main types
pub use config::{EvaluationConfig, MissingPrediction};
pub use error::{EvaluationError, Result};
pub use folds::{Fold, FoldPlan};
pub use harness::{CrossValidator, EvaluationReport, FoldReport, k_fold_rmse};
pub use metrics::rmse;
